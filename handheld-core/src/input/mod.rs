//! Input decoding
//!
//! Raw encoder and button levels go in, [`LogicalEvent`]s come out. The
//! decoder is a pure state machine driven by whoever samples the pins (a
//! polling thread on Linux), so it can be tested without hardware.

pub mod bus;
pub mod decoder;
pub mod event;
pub mod keymap;

pub use bus::{EventBus, SubscriptionId};
pub use decoder::{ButtonState, DecoderStats, EncoderState, InputDecoder, InputFault};
pub use event::{EventKind, LogicalEvent, Topic};
pub use keymap::{map_key, Key};
