//! GPIO vibration motor
//!
//! For boards where the motor transistor sits on a plain GPIO line. Partial
//! intensities are produced by switching the line at 100 Hz for the length
//! of the pulse.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use handheld_core::haptic::{HapticOutput, Pulse};

use crate::error::{pin_error, DriverError};

/// Software PWM period (100 Hz)
const PERIOD_US: u32 = 10_000;

/// Vibration motor on a GPIO pin
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioVibrator<P, D> {
    pin: P,
    delay: D,
    /// If true, motor ON = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin, D: DelayNs> GpioVibrator<P, D> {
    /// Create the output with the motor stopped
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin driving the motor
    /// - `inverted`: If true, the motor runs while the pin is LOW
    pub fn new(pin: P, delay: D, inverted: bool) -> Result<Self, DriverError> {
        let mut motor = Self {
            pin,
            delay,
            inverted,
            on: false,
        };
        motor.set_on(false)?;
        Ok(motor)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    fn set_on(&mut self, on: bool) -> Result<(), DriverError> {
        self.on = on;
        if on != self.inverted {
            self.pin.set_high().map_err(pin_error)
        } else {
            self.pin.set_low().map_err(pin_error)
        }
    }

    fn run(&mut self, pulse: Pulse) -> Result<(), DriverError> {
        if pulse.intensity >= 100 {
            self.set_on(true)?;
            self.delay.delay_ms(pulse.duration_ms);
            return Ok(());
        }

        let on_us = PERIOD_US * pulse.intensity as u32 / 100;
        let periods = (pulse.duration_ms * 1000).div_ceil(PERIOD_US);
        for _ in 0..periods {
            self.set_on(true)?;
            self.delay.delay_us(on_us);
            self.set_on(false)?;
            self.delay.delay_us(PERIOD_US - on_us);
        }
        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs> HapticOutput for GpioVibrator<P, D> {
    type Error = DriverError;

    fn pulse(&mut self, pulse: Pulse) -> Result<(), DriverError> {
        if pulse.intensity == 0 || pulse.duration_ms == 0 {
            return Ok(());
        }
        let result = self.run(pulse);
        let stopped = self.set_on(false);
        result.and(stopped)
    }
}
