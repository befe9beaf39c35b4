//! Configuration types
//!
//! One explicit [`Config`] value is built at startup and handed by
//! reference to every component that needs it. Loading it from disk is the
//! binary's job; this module only defines the shape, the defaults and the
//! validation rules.

pub mod hardware;
pub mod types;

use alloc::collections::BTreeMap;
use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use hardware::{PinConfig, PinMap};
pub use types::{Color, DisplayConfig, HapticConfig, InputConfig, Theme};

/// Free-form per-app settings (`apps.<id>.<key> = "value"`)
pub type AppSettings = BTreeMap<String, BTreeMap<String, String>>;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Width or height is zero
    ZeroDimension,
    /// Rotation is not a multiple of 90 below 360
    InvalidRotation,
    /// Chunk size is zero or odd
    InvalidChunkSize,
    /// SPI mode above 3
    InvalidSpiMode,
    /// Long-press threshold does not exceed the debounce gap
    HoldNotAboveDebounce,
    /// Steps per detent is zero
    ZeroStepsPerDetent,
    /// Tick interval is zero
    ZeroTick,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::ZeroDimension => "display width and height must be non-zero",
            ConfigError::InvalidRotation => "display rotation must be 0, 90, 180 or 270",
            ConfigError::InvalidChunkSize => "display chunk size must be even and non-zero",
            ConfigError::InvalidSpiMode => "display spi mode must be 0, 1, 2 or 3",
            ConfigError::HoldNotAboveDebounce => "long-press threshold must exceed the debounce gap",
            ConfigError::ZeroStepsPerDetent => "steps per detent must be at least 1",
            ConfigError::ZeroTick => "tick interval must be non-zero",
        };
        f.write_str(msg)
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub display: DisplayConfig,
    pub pins: PinMap,
    pub input: InputConfig,
    pub haptic: HapticConfig,
    pub theme: Theme,
    /// Tick loop interval
    pub tick_ms: u32,
    /// Screen launched by a hold at the root menu
    pub shortcut: Option<String>,
    /// Where the high-score table lives
    pub highscore_path: String,
    pub apps: AppSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            pins: PinMap::default(),
            input: InputConfig::default(),
            haptic: HapticConfig::default(),
            theme: Theme::default(),
            tick_ms: 30,
            shortcut: Some(String::from("torch")),
            highscore_path: String::from("highscores.json"),
            apps: AppSettings::new(),
        }
    }
}

impl Config {
    /// Check the values the runtime relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if !matches!(self.display.rotation, 0 | 90 | 180 | 270) {
            return Err(ConfigError::InvalidRotation);
        }
        if self.display.chunk_size == 0 || self.display.chunk_size % 2 != 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        if self.display.spi_mode > 3 {
            return Err(ConfigError::InvalidSpiMode);
        }
        if self.input.long_press_ms <= self.input.debounce_ms {
            return Err(ConfigError::HoldNotAboveDebounce);
        }
        if self.input.steps_per_detent == 0 {
            return Err(ConfigError::ZeroStepsPerDetent);
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }

    /// Look up one app setting
    pub fn app_setting(&self, app: &str, key: &str) -> Option<&str> {
        self.apps.get(app)?.get(key).map(String::as_str)
    }

    /// Set one app setting, creating the app table if needed
    pub fn set_app_setting(&mut self, app: &str, key: &str, value: impl Into<String>) {
        self.apps
            .entry(String::from(app))
            .or_default()
            .insert(String::from(key), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.display.width, 240);
        assert_eq!(config.display.height, 320);
        assert_eq!(config.tick_ms, 30);
        assert_eq!(config.input.long_press_ms, 500);
    }

    #[test]
    fn test_rejects_odd_chunk() {
        let mut config = Config::default();
        config.display.chunk_size = 4095;
        assert_eq!(config.validate(), Err(ConfigError::InvalidChunkSize));
        config.display.chunk_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidChunkSize));
    }

    #[test]
    fn test_spi_mode_defaults_to_three() {
        let mut config = Config::default();
        assert_eq!(config.display.spi_mode, 3);
        config.display.spi_mode = 0;
        assert_eq!(config.validate(), Ok(()));
        config.display.spi_mode = 4;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSpiMode));
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let mut config = Config::default();
        config.display.height = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDimension));
    }

    #[test]
    fn test_rejects_hold_below_debounce() {
        let mut config = Config::default();
        config.input.long_press_ms = 20;
        assert_eq!(config.validate(), Err(ConfigError::HoldNotAboveDebounce));
    }

    #[test]
    fn test_rejects_bad_rotation() {
        let mut config = Config::default();
        config.display.rotation = 45;
        assert_eq!(config.validate(), Err(ConfigError::InvalidRotation));
    }

    #[test]
    fn test_app_settings() {
        let mut config = Config::default();
        assert_eq!(config.app_setting("weather", "api_key"), None);
        config.set_app_setting("weather", "api_key", "abc");
        assert_eq!(config.app_setting("weather", "api_key"), Some("abc"));
    }
}
