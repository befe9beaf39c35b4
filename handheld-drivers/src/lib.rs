//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in handheld-core and handheld-display over `embedded-hal` 1.0:
//!
//! - Display: ST7789 panel over SPI with a data/command line
//! - Haptic: vibration motor on a plain GPIO line
//! - Input: rotary encoder and push switch sampled from GPIO inputs

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

mod error;
#[cfg(test)]
mod mock;

pub mod display;
pub mod haptic;
pub mod input;

pub use error::DriverError;
