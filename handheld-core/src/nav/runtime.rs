//! Navigation runtime
//!
//! Drives the focus stack:
//!
//! - `tick`: update the top screen, draw it into the frame, flush
//! - `handle_event`: offer an event to the top screen if it is bound to
//!   that kind; an unconsumed `Hold` closes the screen, or at the root
//!   launches the configured shortcut
//! - faults from any screen call close that screen and log; the runtime
//!   itself never fails
//!
//! Input bindings live in an [`EventBus`] keyed by stack entry. On every
//! focus change the bus is cleared first and then filled with the new top
//! screen's topics, so two screens' bindings never overlap.

use alloc::boxed::Box;
use alloc::vec::Vec;

use embedded_graphics::prelude::*;
use handheld_display::{DisplayBackend, DisplayPipeline};

use super::guard::contain;
use super::menu::{CategoryMenu, RootMenu};
use super::registry::{AppRegistry, Category, LaunchContext};
use super::screen::{Context, Request, Screen, ScreenFault};
use super::stack::{Entry, FocusStack, NavState};
use crate::config::Config;
use crate::input::{EventBus, LogicalEvent};

/// Millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<F: Fn() -> u64> Clock for F {
    fn now_ms(&self) -> u64 {
        self()
    }
}

/// Navigation state machine over the focus stack
pub struct Runtime {
    config: Config,
    registry: AppRegistry,
    stack: FocusStack,
    /// Topics of the focused screen, keyed by its entry key
    bindings: EventBus<u64>,
    clock: Box<dyn Clock>,
    next_key: u64,
    faults: u32,
}

impl Runtime {
    /// Create a runtime showing the root menu
    pub fn new(config: Config, registry: AppRegistry, clock: impl Clock + 'static) -> Self {
        let root = RootMenu::new(&config.theme, config.display.height);
        let mut runtime = Self {
            config,
            registry,
            stack: FocusStack::new(Entry {
                key: 0,
                state: NavState::RootMenu,
                screen: Box::new(root),
            }),
            bindings: EventBus::new(),
            clock: Box::new(clock),
            next_key: 1,
            faults: 0,
        };
        runtime.bind_focus();
        tracing::info!(apps = runtime.registry.len(), "navigation runtime ready");
        runtime
    }

    /// Stack depth, root included
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Level of the focused screen
    pub fn state(&self) -> NavState {
        self.stack.top().state
    }

    /// Name of the focused screen
    pub fn active_name(&self) -> &str {
        self.stack.top().screen.name()
    }

    /// Screen faults contained so far
    pub fn faults(&self) -> u32 {
        self.faults
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Input bindings currently installed
    pub fn bindings(&self) -> &EventBus<u64> {
        &self.bindings
    }

    /// Launch an app by id on top of the current screen
    ///
    /// On failure the stack is left unchanged.
    pub fn launch(&mut self, id: &str) -> Result<(), ScreenFault> {
        let Some(app) = self.registry.get(id) else {
            tracing::warn!(app = id, "launch of unknown app ignored");
            return Err(ScreenFault::Launch("unknown app id"));
        };
        let ctx = LaunchContext {
            config: &self.config,
            now_ms: self.clock.now_ms(),
        };

        match contain("launch", || app.launch(&ctx)) {
            Ok(screen) => {
                self.push(NavState::RunningScreen, screen);
                tracing::info!(app = id, depth = self.stack.depth(), "launched");
                Ok(())
            }
            Err(fault) => {
                self.faults = self.faults.saturating_add(1);
                tracing::error!(app = id, %fault, "launch failed");
                Err(fault)
            }
        }
    }

    /// Push the app list for one category
    pub fn open_category(&mut self, category: Category) {
        let menu = CategoryMenu::new(
            category,
            &self.registry,
            &self.config.theme,
            self.config.display.height,
        );
        self.push(NavState::SubMenu, Box::new(menu));
        tracing::info!(category = category.label(), "opened category");
    }

    /// Close the focused screen; `false` at the root
    pub fn back(&mut self) -> bool {
        match self.stack.pop() {
            Some(entry) => {
                tracing::info!(screen = entry.screen.name(), depth = self.stack.depth(), "closed");
                drop(entry);
                self.bind_focus();
                true
            }
            None => false,
        }
    }

    /// Launch the configured shortcut screen
    pub fn shortcut(&mut self) {
        match self.config.shortcut.clone() {
            Some(id) => {
                tracing::info!(app = %id, "shortcut");
                // Failures are logged by launch
                let _ = self.launch(&id);
            }
            None => tracing::warn!("shortcut requested but none configured"),
        }
    }

    /// Route one input event
    pub fn handle_event(&mut self, event: LogicalEvent) {
        let mut ctx = Context::new(self.clock.now_ms());

        let consumed = if self.is_bound(event) {
            let screen = &mut self.stack.top_mut().screen;
            match contain("handle", || screen.handle(event, &mut ctx)) {
                Ok(consumed) => consumed,
                Err(fault) => {
                    self.fault(fault);
                    return;
                }
            }
        } else {
            tracing::debug!(?event, screen = self.active_name(), "event not bound");
            false
        };

        let requests = ctx.into_requests();
        let navigated = !requests.is_empty();
        self.apply(requests);

        if !consumed && !navigated && event == LogicalEvent::Hold {
            if self.stack.is_at_root() {
                self.shortcut();
            } else {
                self.back();
            }
        }
    }

    /// Update and draw the focused screen, then flush
    ///
    /// A screen that faults while drawing is closed and its parent is drawn
    /// in the same tick. Flush failures are left to the pipeline; the next
    /// tick flushes again.
    pub fn tick<B: DisplayBackend>(&mut self, display: &mut DisplayPipeline<B>) {
        let mut ctx = Context::new(self.clock.now_ms());
        let screen = &mut self.stack.top_mut().screen;
        match contain("update", || screen.update(&mut ctx)) {
            Ok(()) => self.apply(ctx.into_requests()),
            Err(fault) => self.fault(fault),
        }

        loop {
            let screen = &mut self.stack.top_mut().screen;
            let frame = display.frame_mut();
            match contain("draw", || screen.draw(frame)) {
                Ok(()) => break,
                Err(fault) => {
                    let at_root = self.stack.is_at_root();
                    self.fault(fault);
                    if at_root {
                        let _ = display.frame_mut().clear(self.config.theme.bg());
                        break;
                    }
                }
            }
        }

        if let Err(e) = display.flush() {
            tracing::trace!(error = %e, "frame dropped");
        }
    }

    fn push(&mut self, state: NavState, screen: Box<dyn Screen>) {
        let key = self.next_key;
        self.next_key += 1;
        self.stack.push(Entry { key, state, screen });
        self.bind_focus();
    }

    /// Replace all bindings with the focused screen's
    fn bind_focus(&mut self) {
        self.bindings.clear();
        let top = self.stack.top();
        for topic in top.screen.bindings() {
            self.bindings.subscribe(*topic, top.key);
        }
        tracing::debug!(screen = top.screen.name(), bindings = self.bindings.len(), "focus changed");
    }

    fn is_bound(&self, event: LogicalEvent) -> bool {
        let key = self.stack.top().key;
        self.bindings.subscribers(event.kind()).any(|k| *k == key)
    }

    fn apply(&mut self, requests: Vec<Request>) {
        for request in requests {
            match request {
                Request::Launch(id) => {
                    let _ = self.launch(&id);
                }
                Request::OpenCategory(category) => self.open_category(category),
                Request::Close => {
                    self.back();
                }
            }
        }
    }

    /// Contain a fault from the focused screen
    fn fault(&mut self, fault: ScreenFault) {
        self.faults = self.faults.saturating_add(1);
        tracing::error!(screen = self.active_name(), %fault, "screen fault, closing");
        if !self.back() {
            tracing::error!("root menu faulted; keeping it");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Topic;
    use crate::nav::registry::AppDescriptor;
    use handheld_display::{FrameBuffer, MemoryBackend};

    /// Screen that only listens to taps and never consumes anything else
    struct TapOnly;

    impl Screen for TapOnly {
        fn name(&self) -> &str {
            "tap-only"
        }
        fn bindings(&self) -> &'static [Topic] {
            &[Topic::Kind(crate::input::EventKind::Tap)]
        }
        fn update(&mut self, _ctx: &mut Context) -> Result<(), ScreenFault> {
            Ok(())
        }
        fn draw(&mut self, _frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
            Ok(())
        }
        fn handle(&mut self, _event: LogicalEvent, _ctx: &mut Context) -> Result<bool, ScreenFault> {
            Ok(true)
        }
    }

    fn runtime() -> Runtime {
        let mut registry = AppRegistry::new();
        registry
            .register(AppDescriptor::new("tap", "Tap", Category::Apps, |_| {
                Ok(Box::new(TapOnly) as Box<dyn Screen>)
            }))
            .unwrap();
        Runtime::new(Config::default(), registry, || 0u64)
    }

    #[test]
    fn test_starts_at_root() {
        let rt = runtime();
        assert_eq!(rt.depth(), 1);
        assert_eq!(rt.state(), NavState::RootMenu);
        assert_eq!(rt.active_name(), "Main Menu");
    }

    #[test]
    fn test_bindings_replaced_on_focus_change() {
        let mut rt = runtime();
        assert_eq!(rt.bindings().len(), 1);

        rt.launch("tap").unwrap();
        assert_eq!(rt.bindings().len(), 1);
        assert_eq!(rt.bindings().subscribers(crate::input::EventKind::Rotate).count(), 0);

        // Unbound hold is unconsumed: back to root
        rt.handle_event(LogicalEvent::Hold);
        assert_eq!(rt.depth(), 1);
        assert_eq!(rt.bindings().subscribers(crate::input::EventKind::Rotate).count(), 1);
    }

    #[test]
    fn test_unknown_launch_leaves_stack() {
        let mut rt = runtime();
        assert_eq!(rt.launch("nope"), Err(ScreenFault::Launch("unknown app id")));
        assert_eq!(rt.depth(), 1);
        assert_eq!(rt.faults(), 0);
    }

    #[test]
    fn test_root_tick_draws_carousel() {
        let mut rt = runtime();
        let mut display = DisplayPipeline::new(MemoryBackend::new(), 240, 320);
        rt.tick(&mut display);
        assert_eq!(display.backend().flushes(), 1);
        // Carousel card border is accent-coloured somewhere on the centre column
        let accent = rt.config().theme.accent();
        let frame = display.backend().last_frame().unwrap();
        assert!((0..320).any(|y| frame.pixel(120, y) == Some(accent)));
    }
}
