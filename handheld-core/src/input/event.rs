//! Logical input events

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The four things the knob can say
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LogicalEvent {
    /// One detent counter-clockwise
    RotateLeft,
    /// One detent clockwise
    RotateRight,
    /// Short press, released before the hold threshold
    Tap,
    /// Long press; also the "back" binding
    Hold,
}

impl LogicalEvent {
    /// Subscription kind this event is delivered under
    pub fn kind(&self) -> EventKind {
        match self {
            LogicalEvent::RotateLeft | LogicalEvent::RotateRight => EventKind::Rotate,
            LogicalEvent::Tap => EventKind::Tap,
            LogicalEvent::Hold => EventKind::Hold,
        }
    }

    /// Check if this event is a rotation
    pub fn is_rotation(&self) -> bool {
        self.kind() == EventKind::Rotate
    }

    /// Signed direction of a rotation (-1, +1), zero for button events
    pub fn delta(&self) -> i32 {
        match self {
            LogicalEvent::RotateLeft => -1,
            LogicalEvent::RotateRight => 1,
            _ => 0,
        }
    }
}

/// Event kinds a subscriber can register for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventKind {
    Rotate,
    Tap,
    Hold,
}

/// What a subscription listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// Only events of one kind
    Kind(EventKind),
    /// Every event
    Any,
}

impl Topic {
    pub fn matches(&self, event: LogicalEvent) -> bool {
        self.accepts(event.kind())
    }

    /// Check if events of `kind` are delivered under this topic
    pub fn accepts(&self, kind: EventKind) -> bool {
        match self {
            Topic::Kind(k) => *k == kind,
            Topic::Any => true,
        }
    }
}

impl From<EventKind> for Topic {
    fn from(kind: EventKind) -> Self {
        Topic::Kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(LogicalEvent::RotateLeft.kind(), EventKind::Rotate);
        assert_eq!(LogicalEvent::RotateRight.kind(), EventKind::Rotate);
        assert_eq!(LogicalEvent::Tap.kind(), EventKind::Tap);
        assert_eq!(LogicalEvent::Hold.kind(), EventKind::Hold);
    }

    #[test]
    fn test_topic_matching() {
        assert!(Topic::Any.matches(LogicalEvent::Hold));
        assert!(Topic::Kind(EventKind::Rotate).matches(LogicalEvent::RotateLeft));
        assert!(!Topic::Kind(EventKind::Tap).matches(LogicalEvent::Hold));
    }

    #[test]
    fn test_delta() {
        assert_eq!(LogicalEvent::RotateLeft.delta(), -1);
        assert_eq!(LogicalEvent::RotateRight.delta(), 1);
        assert_eq!(LogicalEvent::Tap.delta(), 0);
    }
}
