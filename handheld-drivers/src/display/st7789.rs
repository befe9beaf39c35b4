//! ST7789 panel driver (SPI + D/C line)
//!
//! The ST7789 takes a command byte with D/C low, then that command's
//! parameter bytes with D/C high. Chip select is owned by the `SpiDevice`.
//!
//! # Bring-up
//!
//! 1. Hardware reset: RST high, low, high with 100 ms between edges
//! 2. The mode-configuration sequence from `handheld_protocol::init_sequence`
//! 3. Backlight on
//!
//! # Frame writes
//!
//! Each frame opens a full-panel window (CASET, RASET, RAMWR), raises D/C
//! and streams the frame as big-endian RGB565 in chunks of at most
//! `chunk_size` bytes. A failed chunk aborts the frame; the next frame
//! starts over with a fresh window.

use alloc::vec;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use handheld_core::config::DisplayConfig;
use handheld_display::{DisplayBackend, DisplayError, FrameBuffer};
use handheld_protocol::{init_sequence, stream_pixels, Command, Rotation, StreamError, Window};

use crate::error::{pin_error, spi_error, DriverError};

/// Delay between reset edges (ms)
const RESET_DELAY_MS: u32 = 100;

/// ST7789 driver
///
/// Width and height are the frame size after rotation.
pub struct St7789<SPI, DC, RST, BL, D> {
    spi: SPI,
    dc: DC,
    rst: RST,
    backlight: BL,
    delay: D,
    width: u16,
    height: u16,
    rotation: Rotation,
    /// Scratch buffer for one chunk of packed pixels
    chunk: Vec<u8>,
    initialized: bool,
}

impl<SPI, DC, RST, BL, D> St7789<SPI, DC, RST, BL, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    /// Create a driver; nothing is sent until [`init`](Self::init)
    pub fn new(
        spi: SPI,
        dc: DC,
        rst: RST,
        backlight: BL,
        delay: D,
        config: &DisplayConfig,
    ) -> Result<Self, DriverError> {
        let rotation = Rotation::from_degrees(config.rotation).ok_or(DriverError::Rotation)?;
        if config.chunk_size < 2 {
            return Err(DriverError::ChunkSize);
        }
        if config.width == 0 || config.height == 0 {
            return Err(DriverError::Dimensions);
        }
        Ok(Self {
            spi,
            dc,
            rst,
            backlight,
            delay,
            width: config.width,
            height: config.height,
            rotation,
            chunk: vec![0; config.chunk_size],
            initialized: false,
        })
    }

    /// Reset the panel, configure it and turn the backlight on
    pub fn init(&mut self) -> Result<(), DriverError> {
        self.initialized = false;
        self.hard_reset()?;
        for step in init_sequence(self.rotation) {
            self.command(step.command)?;
            if step.delay_ms > 0 {
                self.delay.delay_ms(step.delay_ms);
            }
        }
        self.set_backlight(true)?;
        self.initialized = true;
        tracing::info!(
            width = self.width,
            height = self.height,
            rotation = ?self.rotation,
            "st7789 initialized"
        );
        Ok(())
    }

    /// Pulse the reset line
    pub fn hard_reset(&mut self) -> Result<(), DriverError> {
        self.rst.set_high().map_err(pin_error)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_low().map_err(pin_error)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_high().map_err(pin_error)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Send one command and its parameters
    pub fn command(&mut self, command: Command) -> Result<(), DriverError> {
        self.dc.set_low().map_err(pin_error)?;
        self.spi.write(&[command.opcode()]).map_err(spi_error)?;

        let params = command.params();
        if !params.is_empty() {
            self.dc.set_high().map_err(pin_error)?;
            self.spi.write(&params).map_err(spi_error)?;
        }
        Ok(())
    }

    /// Open `window` for a memory write
    pub fn set_window(&mut self, window: Window) -> Result<(), DriverError> {
        for command in window.commands() {
            self.command(command)?;
        }
        Ok(())
    }

    /// Write a whole frame; returns the number of chunks sent
    pub fn write_frame(&mut self, frame: &FrameBuffer) -> Result<usize, DriverError> {
        if !self.initialized {
            return Err(DriverError::NotInitialized);
        }
        if frame.width() != self.width || frame.height() != self.height {
            return Err(DriverError::Dimensions);
        }

        let window = Window::full(self.width, self.height).map_err(|_| DriverError::Dimensions)?;
        self.set_window(window)?;
        self.dc.set_high().map_err(pin_error)?;

        let spi = &mut self.spi;
        let chunks = stream_pixels(frame.rgb565(), &mut self.chunk, |bytes| spi.write(bytes))
            .map_err(|e| match e {
                StreamError::ChunkTooSmall => DriverError::ChunkSize,
                StreamError::Sink(e) => spi_error(e),
            })?;
        tracing::trace!(chunks, "frame written");
        Ok(chunks)
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), DriverError> {
        if on {
            self.backlight.set_high().map_err(pin_error)
        } else {
            self.backlight.set_low().map_err(pin_error)
        }
    }

    /// Blank the panel and turn the backlight off
    pub fn shutdown(&mut self) -> Result<(), DriverError> {
        self.initialized = false;
        self.command(Command::DisplayOff)?;
        self.set_backlight(false)
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, RST, BL, D) {
        (self.spi, self.dc, self.rst, self.backlight, self.delay)
    }
}

impl<SPI, DC, RST, BL, D> DisplayBackend for St7789<SPI, DC, RST, BL, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    fn flush(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        self.write_frame(frame)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "st7789"
    }

    fn is_ready(&self) -> bool {
        self.initialized
    }
}
