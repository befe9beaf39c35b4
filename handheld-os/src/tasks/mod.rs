//! Worker threads started beside the tick loop
//!
//! - `input`: samples the encoder pins and forwards decoded events
//! - `keys`: reads terminal keys when the panel has no encoder
//! - `haptic`: plays vibration pulses queued by the event bus

pub mod haptic;
pub mod input;
pub mod keys;
