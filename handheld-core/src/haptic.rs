//! Haptic feedback
//!
//! A passive consumer of input events: each event kind maps to one
//! vibration pulse. The policy lives here; running the motor is the job of
//! a [`HapticOutput`] implementation.

use core::convert::Infallible;

use crate::config::HapticConfig;
use crate::input::LogicalEvent;

/// One vibration pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub duration_ms: u32,
    /// Drive strength, 0-100 %
    pub intensity: u8,
}

/// Trait for vibration outputs
///
/// Implementations block for the length of the pulse, so callers run them
/// off the tick loop.
pub trait HapticOutput {
    type Error;

    /// Run one pulse to completion, leaving the motor off
    fn pulse(&mut self, pulse: Pulse) -> Result<(), Self::Error>;
}

/// Output for boards without a motor
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl HapticOutput for Silent {
    type Error = Infallible;

    fn pulse(&mut self, pulse: Pulse) -> Result<(), Self::Error> {
        tracing::trace!(duration_ms = pulse.duration_ms, intensity = pulse.intensity, "haptic pulse (silent)");
        Ok(())
    }
}

/// Event-to-pulse mapping
#[derive(Debug, Clone, Copy)]
pub struct HapticPolicy {
    config: HapticConfig,
}

impl HapticPolicy {
    pub fn new(config: &HapticConfig) -> Self {
        Self { config: *config }
    }

    /// Pulse to play for an event, if any
    ///
    /// Rotation is a light short tick, tap a firmer short tick, hold a long
    /// full-strength buzz.
    pub fn pulse_for(&self, event: LogicalEvent) -> Option<Pulse> {
        if !self.config.enabled {
            return None;
        }
        let pulse = match event {
            LogicalEvent::RotateLeft | LogicalEvent::RotateRight => Pulse {
                duration_ms: self.config.short_ms,
                intensity: 40,
            },
            LogicalEvent::Tap => Pulse {
                duration_ms: self.config.short_ms,
                intensity: 80,
            },
            LogicalEvent::Hold => Pulse {
                duration_ms: self.config.long_ms,
                intensity: 100,
            },
        };
        Some(pulse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_mapping() {
        let policy = HapticPolicy::new(&HapticConfig::default());
        assert_eq!(
            policy.pulse_for(LogicalEvent::RotateLeft),
            Some(Pulse {
                duration_ms: 50,
                intensity: 40
            })
        );
        assert_eq!(
            policy.pulse_for(LogicalEvent::Tap),
            Some(Pulse {
                duration_ms: 50,
                intensity: 80
            })
        );
        assert_eq!(
            policy.pulse_for(LogicalEvent::Hold),
            Some(Pulse {
                duration_ms: 200,
                intensity: 100
            })
        );
    }

    #[test]
    fn test_disabled_is_silent() {
        let config = HapticConfig {
            enabled: false,
            ..HapticConfig::default()
        };
        let policy = HapticPolicy::new(&config);
        assert_eq!(policy.pulse_for(LogicalEvent::Hold), None);
    }
}
