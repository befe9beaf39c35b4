//! Rotary encoder with push switch
//!
//! Samples the three input lines, applies each line's configured
//! inversion and feeds the levels to an [`InputDecoder`]. Polling is the
//! caller's job; one call handles one sample.

use embedded_hal::digital::InputPin;
use handheld_core::config::{InputConfig, PinConfig, PinMap};
use handheld_core::input::{InputDecoder, InputFault, LogicalEvent};
use heapless::Vec;

use crate::error::{pin_error, DriverError};

/// Most events one sample can produce: a detent, a button edge and a hold
pub const MAX_EVENTS_PER_SAMPLE: usize = 3;

/// Logical line levels from one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub a: bool,
    pub b: bool,
    pub pressed: bool,
}

/// The encoder's three input lines
pub struct EncoderPins<A, B, S> {
    clk: A,
    dt: B,
    sw: S,
    clk_cfg: PinConfig,
    dt_cfg: PinConfig,
    sw_cfg: PinConfig,
}

impl<A: InputPin, B: InputPin, S: InputPin> EncoderPins<A, B, S> {
    pub fn new(clk: A, dt: B, sw: S, pins: &PinMap) -> Self {
        Self {
            clk,
            dt,
            sw,
            clk_cfg: pins.encoder_clk,
            dt_cfg: pins.encoder_dt,
            sw_cfg: pins.encoder_sw,
        }
    }

    /// Read all three lines
    pub fn sample(&mut self) -> Result<Sample, DriverError> {
        Ok(Sample {
            a: self.clk_cfg.logical(self.clk.is_high().map_err(pin_error)?),
            b: self.dt_cfg.logical(self.dt.is_high().map_err(pin_error)?),
            pressed: self.sw_cfg.logical(self.sw.is_high().map_err(pin_error)?),
        })
    }
}

/// Encoder input source
pub struct Encoder<A, B, S> {
    pins: EncoderPins<A, B, S>,
    decoder: InputDecoder,
}

impl<A: InputPin, B: InputPin, S: InputPin> Encoder<A, B, S> {
    /// Create the source, seeding the decoder with the current line levels
    pub fn new(mut pins: EncoderPins<A, B, S>, config: &InputConfig) -> Result<Self, DriverError> {
        let first = pins.sample()?;
        Ok(Self {
            pins,
            decoder: InputDecoder::new(config, first.a, first.b),
        })
    }

    pub fn decoder(&self) -> &InputDecoder {
        &self.decoder
    }

    /// Take one sample at `now_ms` and return the events it completed
    ///
    /// Bounce and invalid transitions are absorbed here; only pin read
    /// failures are returned.
    pub fn poll(&mut self, now_ms: u64) -> Result<Vec<LogicalEvent, MAX_EVENTS_PER_SAMPLE>, DriverError> {
        let sample = self.pins.sample()?;
        let mut events = Vec::new();

        let rotation = self.decoder.on_quadrature(sample.a, sample.b);
        let button = self.decoder.on_button(sample.pressed, now_ms);
        let hold = self.decoder.poll(now_ms);

        for result in [rotation, button, Ok(hold)] {
            match result {
                Ok(Some(event)) => {
                    // Capacity matches the three sources above
                    let _ = events.push(event);
                }
                Ok(None) => {}
                Err(InputFault::InvalidTransition) => tracing::trace!("encoder glitch"),
                Err(InputFault::Bounce) => tracing::trace!("switch bounce"),
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{log, MockPin};
    use alloc::rc::Rc;
    use core::cell::RefCell;

    struct Lines {
        a: Rc<RefCell<bool>>,
        b: Rc<RefCell<bool>>,
        sw: Rc<RefCell<bool>>,
    }

    impl Lines {
        fn set(&self, a: bool, b: bool) {
            *self.a.borrow_mut() = a;
            *self.b.borrow_mut() = b;
        }

        /// Electrical level of the switch line
        fn switch(&self, high: bool) {
            *self.sw.borrow_mut() = high;
        }
    }

    fn encoder() -> (Encoder<MockPin, MockPin, MockPin>, Lines) {
        let log = log();
        let clk = MockPin::new("clk", &log);
        let dt = MockPin::new("dt", &log);
        let sw = MockPin::new("sw", &log);
        let lines = Lines {
            a: clk.level.clone(),
            b: dt.level.clone(),
            sw: sw.level.clone(),
        };
        lines.set(true, true);
        // Pulled up, released
        lines.switch(true);

        let pins = EncoderPins::new(clk, dt, sw, &PinMap::default());
        let encoder = Encoder::new(pins, &InputConfig::default()).unwrap();
        (encoder, lines)
    }

    #[test]
    fn test_active_low_switch() {
        let (mut enc, lines) = encoder();
        assert!(!enc.pins.sample().unwrap().pressed);
        lines.switch(false);
        assert!(enc.pins.sample().unwrap().pressed);
    }

    #[test]
    fn test_detent_from_samples() {
        let (mut enc, lines) = encoder();
        let mut events = alloc::vec::Vec::new();
        for (i, (a, b)) in [(false, true), (false, false), (true, false), (true, true)]
            .into_iter()
            .enumerate()
        {
            lines.set(a, b);
            events.extend(enc.poll(i as u64).unwrap());
        }
        assert_eq!(events, [LogicalEvent::RotateRight]);
    }

    #[test]
    fn test_tap_and_hold_from_samples() {
        let (mut enc, lines) = encoder();

        lines.switch(false);
        assert!(enc.poll(0).unwrap().is_empty());
        lines.switch(true);
        assert_eq!(enc.poll(100).unwrap().as_slice(), [LogicalEvent::Tap]);

        lines.switch(false);
        assert!(enc.poll(1000).unwrap().is_empty());
        assert_eq!(enc.poll(1500).unwrap().as_slice(), [LogicalEvent::Hold]);
        lines.switch(true);
        assert!(enc.poll(2000).unwrap().is_empty());
    }

    #[test]
    fn test_glitch_absorbed() {
        let (mut enc, lines) = encoder();
        lines.set(false, false);
        assert!(enc.poll(0).unwrap().is_empty());
        assert_eq!(enc.decoder().stats().invalid_transitions, 1);
    }
}
