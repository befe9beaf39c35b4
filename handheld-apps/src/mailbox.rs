//! Single-slot mailbox for worker results
//!
//! The screen owns the [`Mailbox`]; a worker gets a [`Poster`] holding only
//! a weak reference. When the screen is destroyed the slot goes with it and
//! late posts are refused instead of landing in dead state.

use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Receiving end, owned by the screen
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Arc<Mutex<Option<T>>>,
}

/// Sending end, handed to a worker
#[derive(Debug)]
pub struct Poster<T> {
    slot: Weak<Mutex<Option<T>>>,
}

impl<T> Clone for Poster<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn poster(&self) -> Poster<T> {
        Poster {
            slot: Arc::downgrade(&self.slot),
        }
    }

    /// Take the posted value, if any
    pub fn take(&self) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl<T> Poster<T> {
    /// Replace the slot's value; `false` if the mailbox is gone
    pub fn post(&self, value: T) -> bool {
        match self.slot.upgrade() {
            Some(slot) => {
                *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
                true
            }
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.slot.strong_count() == 0
    }
}
