//! Driver errors

use handheld_display::DisplayError;

/// Errors from the hardware drivers
///
/// Bus and pin error types differ per HAL, so they are reduced to the
/// failing resource here; the HAL error itself is logged where it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// SPI transfer failed
    Spi,
    /// GPIO read or write failed
    Pin,
    /// Frame does not match the configured panel size
    Dimensions,
    /// Rotation is not one of 0, 90, 180, 270
    Rotation,
    /// Chunk buffer cannot hold one pixel
    ChunkSize,
    /// Frame write before `init`
    NotInitialized,
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriverError::Spi => f.write_str("SPI transfer failed"),
            DriverError::Pin => f.write_str("GPIO access failed"),
            DriverError::Dimensions => f.write_str("frame size does not match panel"),
            DriverError::Rotation => f.write_str("unsupported rotation"),
            DriverError::ChunkSize => f.write_str("chunk size too small"),
            DriverError::NotInitialized => f.write_str("driver not initialized"),
        }
    }
}

impl From<DriverError> for DisplayError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::Dimensions => DisplayError::InvalidDimensions,
            DriverError::NotInitialized => DisplayError::NotInitialized,
            DriverError::Rotation | DriverError::ChunkSize => DisplayError::HardwareUnavailable,
            DriverError::Spi | DriverError::Pin => DisplayError::Transport,
        }
    }
}

pub(crate) fn spi_error<E: embedded_hal::spi::Error>(e: E) -> DriverError {
    tracing::debug!(kind = ?e.kind(), "spi error");
    DriverError::Spi
}

pub(crate) fn pin_error<E: embedded_hal::digital::Error>(e: E) -> DriverError {
    tracing::debug!(kind = ?e.kind(), "gpio error");
    DriverError::Pin
}
