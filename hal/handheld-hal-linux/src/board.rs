//! Device bring-up on Linux
//!
//! Each device is opened on its own so a board missing one of them (no
//! motor fitted, panel not wired) can still use the others.

use handheld_core::config::{DisplayConfig, InputConfig, PinConfig, PinMap};
use handheld_drivers::display::St7789;
use handheld_drivers::haptic::GpioVibrator;
use handheld_drivers::input::{Encoder, EncoderPins};
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};

use crate::error::BoardError;
use crate::pins::{PinClaims, Polarity};

/// Consumer label shown by `gpioinfo`
const CONSUMER: &str = "handheld";

pub type Panel = St7789<SpidevDevice, CdevPin, CdevPin, Polarity<CdevPin>, Delay>;
pub type Knob = Encoder<CdevPin, CdevPin, CdevPin>;
pub type Motor = GpioVibrator<CdevPin, Delay>;

/// An opened GPIO chip plus the pin map to allocate from
pub struct Board {
    chip: Chip,
    pins: PinMap,
}

impl Board {
    /// Open the GPIO chip named in `pins`
    ///
    /// Fails without touching any line if the map assigns a line twice.
    pub fn open(pins: &PinMap) -> Result<Self, BoardError> {
        PinClaims::for_map(pins)?;
        let chip = Chip::new(&pins.gpio_chip).map_err(|e| BoardError::Gpio {
            pin: None,
            message: e.to_string(),
        })?;
        tracing::info!(chip = %pins.gpio_chip, "gpio chip opened");
        Ok(Self {
            chip,
            pins: pins.clone(),
        })
    }

    pub fn pins(&self) -> &PinMap {
        &self.pins
    }

    /// Open and initialize the panel
    pub fn panel(&mut self, config: &DisplayConfig) -> Result<Panel, BoardError> {
        let path = format!("/dev/spidev{}.{}", self.pins.spi_bus, self.pins.spi_chip_select);
        let spi_error = |e: &dyn std::fmt::Display| BoardError::Spi {
            path: path.clone(),
            message: e.to_string(),
        };

        let mut spi = SpidevDevice::open(&path).map_err(|e| spi_error(&e))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(config.spi_hz)
            .mode(spi_mode(config.spi_mode))
            .build();
        spi.0.configure(&options).map_err(|e| spi_error(&e))?;

        let dc = self.output(self.pins.display_dc)?;
        let rst = self.output(self.pins.display_rst)?;
        let backlight = Polarity::new(self.output(self.pins.backlight)?, self.pins.backlight);

        let mut panel = St7789::new(spi, dc, rst, backlight, Delay, config)?;
        panel.init()?;
        tracing::info!(spi = %path, hz = config.spi_hz, mode = config.spi_mode, "panel ready");
        Ok(panel)
    }

    /// Open the encoder lines and seed the decoder from them
    pub fn encoder(&mut self, config: &InputConfig) -> Result<Knob, BoardError> {
        let clk = self.input(self.pins.encoder_clk)?;
        let dt = self.input(self.pins.encoder_dt)?;
        let sw = self.input(self.pins.encoder_sw)?;
        let encoder = Encoder::new(EncoderPins::new(clk, dt, sw, &self.pins), config)?;
        tracing::info!(
            clk = self.pins.encoder_clk.pin,
            dt = self.pins.encoder_dt.pin,
            sw = self.pins.encoder_sw.pin,
            "encoder ready"
        );
        Ok(encoder)
    }

    /// Open the vibration motor line, motor off
    pub fn motor(&mut self) -> Result<Motor, BoardError> {
        let cfg = self.pins.haptic;
        let pin = self.output(cfg)?;
        let motor = GpioVibrator::new(pin, Delay, cfg.inverted)?;
        tracing::info!(pin = cfg.pin, "vibration motor ready");
        Ok(motor)
    }

    fn output(&mut self, cfg: PinConfig) -> Result<CdevPin, BoardError> {
        self.request(cfg, LineRequestFlags::OUTPUT)
    }

    /// Inputs are requested without kernel inversion; consumers apply it
    fn input(&mut self, cfg: PinConfig) -> Result<CdevPin, BoardError> {
        if cfg.pull_up {
            // The v1 character device cannot set bias
            tracing::debug!(pin = cfg.pin, "pull-up expected from board configuration");
        }
        self.request(cfg, LineRequestFlags::INPUT)
    }

    fn request(&mut self, cfg: PinConfig, flags: LineRequestFlags) -> Result<CdevPin, BoardError> {
        let gpio_error = |e: &dyn std::fmt::Display| BoardError::Gpio {
            pin: Some(cfg.pin),
            message: e.to_string(),
        };
        let handle = self
            .chip
            .get_line(cfg.pin as u32)
            .and_then(|line| line.request(flags, 0, CONSUMER))
            .map_err(|e| gpio_error(&e))?;
        CdevPin::new(handle).map_err(|e| gpio_error(&e))
    }
}

/// Clock polarity and phase for a mode number; validation keeps it in 0-3
fn spi_mode(mode: u8) -> SpiModeFlags {
    match mode {
        0 => SpiModeFlags::SPI_MODE_0,
        1 => SpiModeFlags::SPI_MODE_1,
        2 => SpiModeFlags::SPI_MODE_2,
        _ => SpiModeFlags::SPI_MODE_3,
    }
}
