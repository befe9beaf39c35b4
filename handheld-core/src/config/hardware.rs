//! Hardware configuration types
//!
//! Pin assignments for the panel, encoder and vibration motor. Pin numbers
//! are GPIO line offsets on the board's GPIO character device.

use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinConfig {
    /// GPIO line offset
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }

    /// Create a pulled-up pin that reads active when low (switch to ground)
    pub const fn active_low(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }

    /// Logical level for a raw electrical level
    pub const fn logical(&self, raw_high: bool) -> bool {
        raw_high != self.inverted
    }
}

/// Board pin map
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinMap {
    /// GPIO character device holding every line below
    pub gpio_chip: String,
    /// SPI bus number (`/dev/spidev<bus>.<cs>`)
    pub spi_bus: u8,
    /// Hardware chip select on that bus
    pub spi_chip_select: u8,
    /// Panel data/command strobe
    pub display_dc: PinConfig,
    /// Panel reset (active low)
    pub display_rst: PinConfig,
    /// Panel backlight
    pub backlight: PinConfig,
    /// Encoder channel A
    pub encoder_clk: PinConfig,
    /// Encoder channel B
    pub encoder_dt: PinConfig,
    /// Encoder push switch
    pub encoder_sw: PinConfig,
    /// Vibration motor driver
    pub haptic: PinConfig,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            gpio_chip: String::from("/dev/gpiochip0"),
            spi_bus: 0,
            // CE0 = GPIO 8
            spi_chip_select: 0,
            display_dc: PinConfig::new(25),
            display_rst: PinConfig::new(27),
            backlight: PinConfig::new(18),
            encoder_clk: PinConfig::with_pullup(5),
            encoder_dt: PinConfig::with_pullup(6),
            encoder_sw: PinConfig::active_low(13),
            haptic: PinConfig::new(26),
        }
    }
}

impl PinMap {
    /// Every line offset this map claims, for conflict checks
    pub fn lines(&self) -> [u8; 7] {
        [
            self.display_dc.pin,
            self.display_rst.pin,
            self.backlight.pin,
            self.encoder_clk.pin,
            self.encoder_dt.pin,
            self.encoder_sw.pin,
            self.haptic.pin,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_low_logical_level() {
        let sw = PinConfig::active_low(13);
        assert!(sw.logical(false));
        assert!(!sw.logical(true));

        let plain = PinConfig::new(5);
        assert!(plain.logical(true));
    }

    #[test]
    fn test_default_lines_unique() {
        let lines = PinMap::default().lines();
        for (i, a) in lines.iter().enumerate() {
            assert!(lines[i + 1..].iter().all(|b| b != a));
        }
    }
}
