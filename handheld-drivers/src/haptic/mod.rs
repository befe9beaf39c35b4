//! Vibration motor output
//!
//! An on/off GPIO line driven with a 100 Hz software duty cycle, so the
//! pulse intensity still reads as stronger or weaker.

pub mod gpio;

pub use gpio::GpioVibrator;
