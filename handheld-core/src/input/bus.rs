//! Event subscription registry
//!
//! Subscribers are stored in a generational slot arena. A subscription
//! hands back a [`SubscriptionId`] (slot index plus generation) rather than
//! a reference, so a screen that goes away only has to drop its ids: a
//! stale id never reaches a newer subscriber that reused the slot.

use alloc::vec::Vec;

use super::event::{EventKind, LogicalEvent, Topic};

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    index: u32,
    generation: u32,
}

struct Slot<H> {
    generation: u32,
    entry: Option<(Topic, H)>,
}

/// Publish/subscribe registry keyed by event kind
///
/// `H` is whatever a subscriber is: a closure for fire-and-forget
/// consumers, or a plain key that the owner resolves itself.
pub struct EventBus<H> {
    slots: Vec<Slot<H>>,
    free: Vec<u32>,
    live: usize,
}

impl<H> Default for EventBus<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> EventBus<H> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Register `handler` for `topic`
    pub fn subscribe(&mut self, topic: impl Into<Topic>, handler: H) -> SubscriptionId {
        let topic = topic.into();
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some((topic, handler));
            return SubscriptionId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some((topic, handler)),
        });
        SubscriptionId {
            index,
            generation: 0,
        }
    }

    /// Release a subscription
    ///
    /// Returns `false` for an id that is stale or already released.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.slots.get_mut(id.index as usize) {
            Some(slot) if slot.generation == id.generation && slot.entry.is_some() => {
                Self::vacate(slot);
                self.free.push(id.index);
                self.live -= 1;
                true
            }
            _ => false,
        }
    }

    /// Check if an id still refers to a live subscription
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.generation == id.generation && slot.entry.is_some())
    }

    /// Handlers registered for events of `kind` (including `Any`)
    pub fn subscribers(&self, kind: EventKind) -> impl Iterator<Item = &H> + '_ {
        self.slots.iter().filter_map(move |slot| match &slot.entry {
            Some((topic, handler)) if topic.accepts(kind) => Some(handler),
            _ => None,
        })
    }

    /// Drop every subscription; all outstanding ids become stale
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.is_some() {
                Self::vacate(slot);
            }
            self.free.push(index as u32);
        }
        self.live = 0;
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn vacate(slot: &mut Slot<H>) {
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
    }
}

impl<H: FnMut(LogicalEvent)> EventBus<H> {
    /// Deliver an event to every matching handler, synchronously
    ///
    /// Returns the number of handlers called.
    pub fn publish(&mut self, event: LogicalEvent) -> usize {
        let mut delivered = 0;
        for slot in self.slots.iter_mut() {
            if let Some((topic, handler)) = &mut slot.entry {
                if topic.matches(event) {
                    handler(event);
                    delivered += 1;
                }
            }
        }
        delivered
    }
}
