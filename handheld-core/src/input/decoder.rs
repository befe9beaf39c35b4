//! Rotary encoder and button decoder
//!
//! Decodes quadrature phase changes into rotation events and classifies
//! button presses into taps and holds.
//!
//! # Quadrature
//!
//! The phase is `(a << 1) | b`. Clockwise rotation walks the Gray-code cycle
//! in one direction, counter-clockwise in the other:
//! ```text
//! CW:   11 → 01 → 00 → 10 → 11
//! CCW:  11 → 10 → 00 → 01 → 11
//! ```
//! A step to a neighbouring phase is ±1. A jump to the opposite phase (both
//! lines changed at once) is bounce: it is rejected, the partial detent is
//! dropped, and tracking continues from the new phase.
//!
//! When `steps_per_detent` divides the cycle (1, 2 or 4), detents are
//! aligned to the rest phases the encoder clicks into (`11`, plus `00` for
//! two-step encoders). Steps accumulate between rest phases; arriving at a
//! rest phase emits one event if at least half a detent was covered and
//! always clears the count, so a dropped sample costs at most the detent it
//! happened in. Other values count steps without alignment and emit every
//! `steps_per_detent` steps.
//!
//! # Button
//!
//! Hold fires eagerly: as soon as a press has lasted the long-press
//! threshold (seen by [`InputDecoder::poll`] or at release, whichever comes
//! first), `Hold` is emitted once. A release after a hold emits nothing. A
//! release before the threshold emits `Tap`. A duration exactly equal to
//! the threshold is a hold.
//!
//! Edges closer than the debounce gap to the previously accepted edge are
//! rejected; the sampler keeps reporting the level, so a real change is
//! picked up once the gap has passed.

use super::event::LogicalEvent;
use crate::config::InputConfig;

/// Position of each phase in the clockwise cycle
const CW_POSITION: [u8; 4] = [
    2, // 00
    1, // 01
    3, // 10
    0, // 11
];

/// Input timing faults
///
/// Both are recovered locally: nothing is emitted and decoding continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFault {
    /// Both quadrature lines changed in one sample
    InvalidTransition,
    /// Button edge inside the debounce gap
    Bounce,
}

impl core::fmt::Display for InputFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InputFault::InvalidTransition => f.write_str("invalid quadrature transition"),
            InputFault::Bounce => f.write_str("button bounce"),
        }
    }
}

/// Button state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Released,
    Pressed {
        /// Timestamp of the accepted press edge (ms)
        since: u64,
        /// Hold already emitted for this press
        hold_fired: bool,
    },
}

/// Decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderState {
    /// Last accepted quadrature phase, `(a << 1) | b`
    pub phase: u8,
    /// Steps toward the next detent (signed)
    pub pending: i32,
    /// Net valid steps since startup
    pub total_steps: i64,
    pub button: ButtonState,
    /// Timestamp of the last accepted button edge (ms)
    pub last_edge: Option<u64>,
}

/// Counters for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderStats {
    pub invalid_transitions: u32,
    pub debounced_edges: u32,
    pub rotations: u32,
    pub taps: u32,
    pub holds: u32,
}

/// Encoder and button decoder
#[derive(Debug, Clone)]
pub struct InputDecoder {
    long_press_ms: u64,
    debounce_ms: u64,
    steps_per_detent: i32,
    state: EncoderState,
    stats: DecoderStats,
}

impl InputDecoder {
    /// Create a decoder starting from the sampled line levels
    pub fn new(config: &InputConfig, a: bool, b: bool) -> Self {
        Self {
            long_press_ms: config.long_press_ms as u64,
            debounce_ms: config.debounce_ms as u64,
            steps_per_detent: config.steps_per_detent.max(1) as i32,
            state: EncoderState {
                phase: phase(a, b),
                pending: 0,
                total_steps: 0,
                button: ButtonState::Released,
                last_edge: None,
            },
            stats: DecoderStats::default(),
        }
    }

    pub fn state(&self) -> &EncoderState {
        &self.state
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Feed the current quadrature line levels
    ///
    /// Returns a rotation event when a detent completes, `Ok(None)` when the
    /// phase is unchanged or mid-detent.
    pub fn on_quadrature(&mut self, a: bool, b: bool) -> Result<Option<LogicalEvent>, InputFault> {
        let new = phase(a, b);
        let old = self.state.phase;
        if new == old {
            return Ok(None);
        }

        let step = (CW_POSITION[new as usize] + 4 - CW_POSITION[old as usize]) % 4;
        self.state.phase = new;

        let delta = match step {
            1 => 1,
            3 => -1,
            _ => {
                // Opposite phase: both lines moved
                self.state.pending = 0;
                self.stats.invalid_transitions = self.stats.invalid_transitions.saturating_add(1);
                tracing::trace!(from = old, to = new, "rejected quadrature transition");
                return Err(InputFault::InvalidTransition);
            }
        };

        self.state.total_steps += delta as i64;
        self.state.pending += delta;

        let threshold = if self.aligned() {
            if !self.is_rest(new) {
                return Ok(None);
            }
            // Half a detent, rounded up
            (self.steps_per_detent + 1) / 2
        } else {
            self.steps_per_detent
        };

        let pending = self.state.pending;
        let event = if pending >= threshold {
            Some(LogicalEvent::RotateRight)
        } else if pending <= -threshold {
            Some(LogicalEvent::RotateLeft)
        } else {
            None
        };

        if event.is_some() || self.aligned() {
            self.state.pending = 0;
        }
        if event.is_some() {
            self.stats.rotations = self.stats.rotations.saturating_add(1);
        } else if pending != 0 && self.aligned() {
            tracing::trace!(pending, "partial detent dropped at rest");
        }
        Ok(event)
    }

    /// Detents line up with rest phases
    fn aligned(&self) -> bool {
        4 % self.steps_per_detent == 0
    }

    fn is_rest(&self, phase: u8) -> bool {
        CW_POSITION[phase as usize] as i32 % self.steps_per_detent == 0
    }

    /// Feed the current button level (`true` = pressed) at `now_ms`
    pub fn on_button(&mut self, pressed: bool, now_ms: u64) -> Result<Option<LogicalEvent>, InputFault> {
        let is_pressed = matches!(self.state.button, ButtonState::Pressed { .. });
        if pressed == is_pressed {
            return Ok(None);
        }

        if let Some(last) = self.state.last_edge {
            if now_ms.saturating_sub(last) < self.debounce_ms {
                self.stats.debounced_edges = self.stats.debounced_edges.saturating_add(1);
                return Err(InputFault::Bounce);
            }
        }
        self.state.last_edge = Some(now_ms);

        match self.state.button {
            ButtonState::Released => {
                self.state.button = ButtonState::Pressed {
                    since: now_ms,
                    hold_fired: false,
                };
                Ok(None)
            }
            ButtonState::Pressed { since, hold_fired } => {
                self.state.button = ButtonState::Released;
                if hold_fired {
                    Ok(None)
                } else if now_ms.saturating_sub(since) >= self.long_press_ms {
                    self.stats.holds = self.stats.holds.saturating_add(1);
                    Ok(Some(LogicalEvent::Hold))
                } else {
                    self.stats.taps = self.stats.taps.saturating_add(1);
                    Ok(Some(LogicalEvent::Tap))
                }
            }
        }
    }

    /// Advance time without an edge
    ///
    /// Emits `Hold` once when a press crosses the threshold.
    pub fn poll(&mut self, now_ms: u64) -> Option<LogicalEvent> {
        if let ButtonState::Pressed {
            since,
            hold_fired: false,
        } = self.state.button
        {
            if now_ms.saturating_sub(since) >= self.long_press_ms {
                self.state.button = ButtonState::Pressed {
                    since,
                    hold_fired: true,
                };
                self.stats.holds = self.stats.holds.saturating_add(1);
                return Some(LogicalEvent::Hold);
            }
        }
        None
    }
}

fn phase(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | b as u8
}
