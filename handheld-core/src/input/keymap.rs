//! Software input source
//!
//! When no encoder is wired up, discrete key presses stand in for it with
//! identical event semantics. Backends translate their own key codes into
//! [`Key`] and run them through [`map_key`].

use super::event::LogicalEvent;

/// Keys the fallback source understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Enter,
    Escape,
    Backspace,
    /// Anything else; ignored
    Other,
}

/// Map a key to the event the encoder would have produced
pub fn map_key(key: Key) -> Option<LogicalEvent> {
    match key {
        Key::Left => Some(LogicalEvent::RotateLeft),
        Key::Right => Some(LogicalEvent::RotateRight),
        Key::Enter => Some(LogicalEvent::Tap),
        Key::Escape | Key::Backspace => Some(LogicalEvent::Hold),
        Key::Other => None,
    }
}
