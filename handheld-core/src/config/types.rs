//! Configuration type definitions

use embedded_graphics::pixelcolor::Rgb888;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Panel geometry and transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Panel rotation in degrees (0, 90, 180, 270)
    pub rotation: u16,
    /// SPI clock
    pub spi_hz: u32,
    /// SPI mode 0-3 (clock polarity and phase); these modules want 3
    pub spi_mode: u8,
    /// Bytes per SPI transfer (must be even)
    pub chunk_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 320,
            rotation: 0,
            spi_hz: 24_000_000,
            spi_mode: 3,
            chunk_size: 4096,
        }
    }
}

/// Input timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    /// Press duration at which a press becomes a hold
    pub long_press_ms: u32,
    /// Minimum gap between accepted button edges
    pub debounce_ms: u32,
    /// Quadrature steps per emitted rotation event
    pub steps_per_detent: u8,
    /// Pin sampling interval
    pub poll_interval_ms: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 500,
            debounce_ms: 20,
            steps_per_detent: 4,
            poll_interval_ms: 1,
        }
    }
}

/// Vibration pulse lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HapticConfig {
    pub enabled: bool,
    pub short_ms: u32,
    pub long_ms: u32,
}

impl Default for HapticConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            short_ms: 50,
            long_ms: 200,
        }
    }
}

/// 8-bit RGB colour as written in config files (`[r, g, b]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color(pub u8, pub u8, pub u8);

impl From<Color> for Rgb888 {
    fn from(Color(r, g, b): Color) -> Self {
        Rgb888::new(r, g, b)
    }
}

/// Shared colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub accent: Color,
    pub highlight: Color,
    pub warning: Color,
    /// Secondary text (hints, units)
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color(0, 0, 0),
            text: Color(255, 255, 255),
            accent: Color(0, 255, 213),
            highlight: Color(40, 40, 40),
            warning: Color(255, 50, 50),
            muted: Color(128, 128, 128),
        }
    }
}

impl Theme {
    pub fn bg(&self) -> Rgb888 {
        self.background.into()
    }

    pub fn fg(&self) -> Rgb888 {
        self.text.into()
    }

    pub fn accent(&self) -> Rgb888 {
        self.accent.into()
    }

    pub fn highlight(&self) -> Rgb888 {
        self.highlight.into()
    }

    pub fn warning(&self) -> Rgb888 {
        self.warning.into()
    }

    pub fn muted(&self) -> Rgb888 {
        self.muted.into()
    }
}
