//! Board errors

use handheld_drivers::DriverError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// One GPIO line assigned to two functions
    PinTaken(u8),
    /// GPIO chip or line could not be opened
    Gpio { pin: Option<u8>, message: String },
    /// SPI device could not be opened or configured
    Spi { path: String, message: String },
    /// Driver bring-up failed
    Driver(DriverError),
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::PinTaken(pin) => write!(f, "GPIO {} assigned twice", pin),
            BoardError::Gpio {
                pin: Some(pin),
                message,
            } => write!(f, "GPIO {}: {}", pin, message),
            BoardError::Gpio { pin: None, message } => write!(f, "GPIO chip: {}", message),
            BoardError::Spi { path, message } => write!(f, "{}: {}", path, message),
            BoardError::Driver(e) => write!(f, "driver: {}", e),
        }
    }
}

impl std::error::Error for BoardError {}

impl From<DriverError> for BoardError {
    fn from(e: DriverError) -> Self {
        BoardError::Driver(e)
    }
}
