//! GPIO line bookkeeping

use std::collections::BTreeSet;

use embedded_hal::digital::{ErrorType, OutputPin};
use handheld_core::config::{PinConfig, PinMap};

use crate::error::BoardError;

/// Lines already handed out
#[derive(Debug, Default)]
pub struct PinClaims {
    taken: BTreeSet<u8>,
}

impl PinClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim every line in the pin map, failing on the first duplicate
    pub fn for_map(pins: &PinMap) -> Result<Self, BoardError> {
        let mut claims = Self::new();
        for pin in pins.lines() {
            claims.claim(pin)?;
        }
        Ok(claims)
    }

    pub fn claim(&mut self, pin: u8) -> Result<(), BoardError> {
        if self.taken.insert(pin) {
            Ok(())
        } else {
            Err(BoardError::PinTaken(pin))
        }
    }

    pub fn is_taken(&self, pin: u8) -> bool {
        self.taken.contains(&pin)
    }
}

/// Output pin with inverted polarity
///
/// `set_high` drives the line low and vice versa.
pub struct ActiveLow<P>(pub P);

impl<P: ErrorType> ErrorType for ActiveLow<P> {
    type Error = P::Error;
}

impl<P: OutputPin> OutputPin for ActiveLow<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }
}

/// Output pin honouring a [`PinConfig`]'s inversion
pub enum Polarity<P> {
    Normal(P),
    Inverted(ActiveLow<P>),
}

impl<P> Polarity<P> {
    pub fn new(pin: P, config: PinConfig) -> Self {
        if config.inverted {
            Polarity::Inverted(ActiveLow(pin))
        } else {
            Polarity::Normal(pin)
        }
    }
}

impl<P: ErrorType> ErrorType for Polarity<P> {
    type Error = P::Error;
}

impl<P: OutputPin> OutputPin for Polarity<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        match self {
            Polarity::Normal(p) => p.set_low(),
            Polarity::Inverted(p) => p.set_low(),
        }
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        match self {
            Polarity::Normal(p) => p.set_high(),
            Polarity::Inverted(p) => p.set_high(),
        }
    }
}
