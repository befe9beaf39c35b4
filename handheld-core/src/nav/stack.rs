//! Focus stack
//!
//! The ordered path from the root menu to the active screen. The top entry
//! is the only one that receives ticks and input. The bottom entry is
//! never popped.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use super::screen::Screen;

/// Navigation level of a stack entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Bottom of the stack, always present
    RootMenu,
    /// A category listing
    SubMenu,
    /// A launched app, tool or game
    RunningScreen,
}

/// One screen on the stack
pub struct Entry {
    /// Unique for the runtime's lifetime; used as the input binding owner
    pub key: u64,
    pub state: NavState,
    pub screen: Box<dyn Screen>,
}

impl core::fmt::Debug for Entry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("screen", &self.screen.name())
            .finish()
    }
}

#[derive(Debug)]
pub struct FocusStack {
    entries: Vec<Entry>,
}

impl FocusStack {
    /// Create a stack holding only the root
    pub fn new(root: Entry) -> Self {
        Self {
            entries: vec![root],
        }
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Remove the top entry; `None` at the root
    pub fn pop(&mut self) -> Option<Entry> {
        if self.entries.len() > 1 {
            self.entries.pop()
        } else {
            None
        }
    }

    /// The active entry
    pub fn top(&self) -> &Entry {
        // Never empty: the root is never removed
        &self.entries[self.entries.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut Entry {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Number of entries, root included
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.entries.len() == 1
    }

    /// Names from root to top
    pub fn path(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.screen.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::LogicalEvent;
    use crate::nav::screen::{Context, ScreenFault};
    use handheld_display::FrameBuffer;

    struct Named(&'static str);

    impl Screen for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn update(&mut self, _ctx: &mut Context) -> Result<(), ScreenFault> {
            Ok(())
        }
        fn draw(&mut self, _frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
            Ok(())
        }
        fn handle(&mut self, _event: LogicalEvent, _ctx: &mut Context) -> Result<bool, ScreenFault> {
            Ok(false)
        }
    }

    fn entry(key: u64, name: &'static str, state: NavState) -> Entry {
        Entry {
            key,
            state,
            screen: Box::new(Named(name)),
        }
    }

    #[test]
    fn test_root_never_popped() {
        let mut stack = FocusStack::new(entry(0, "root", NavState::RootMenu));
        assert!(stack.is_at_root());
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_push_pop_restores_parent() {
        let mut stack = FocusStack::new(entry(0, "root", NavState::RootMenu));
        stack.push(entry(1, "tools", NavState::SubMenu));
        stack.push(entry(2, "torch", NavState::RunningScreen));

        let path: Vec<&str> = stack.path().collect();
        assert_eq!(path, ["root", "tools", "torch"]);
        assert_eq!(stack.top().state, NavState::RunningScreen);

        let popped = stack.pop().unwrap();
        assert_eq!(popped.key, 2);
        assert_eq!(stack.top().screen.name(), "tools");
    }
}
