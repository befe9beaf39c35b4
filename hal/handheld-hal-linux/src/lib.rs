//! Linux board support
//!
//! Opens the panel, encoder and vibration motor described by a [`PinMap`]
//! on a Linux single-board computer:
//!
//! - GPIO lines through the character device (`/dev/gpiochipN`)
//! - The panel through spidev (`/dev/spidevB.C`)
//!
//! Every line is claimed once; a pin map that assigns one line to two
//! functions is rejected before any device is touched.
//!
//! [`PinMap`]: handheld_core::config::PinMap

#![deny(unsafe_code)]

mod error;
pub mod pins;

#[cfg(target_os = "linux")]
pub mod board;

pub use error::BoardError;
pub use pins::{ActiveLow, PinClaims, Polarity};

#[cfg(target_os = "linux")]
pub use board::{Board, Knob, Motor, Panel};
