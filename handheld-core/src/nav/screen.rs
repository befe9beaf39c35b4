//! Screen contract
//!
//! Menus, tools and games all implement [`Screen`]. The runtime only ever
//! talks to the top of the stack through this interface.

use alloc::string::String;
use alloc::vec::Vec;
use core::convert::Infallible;

use handheld_display::FrameBuffer;

use super::registry::Category;
use crate::input::{LogicalEvent, Topic};

/// Failure inside a screen
///
/// Carries a short static description for the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenFault {
    /// `update` failed
    Update(&'static str),
    /// `draw` failed
    Draw(&'static str),
    /// `handle` failed
    Handle(&'static str),
    /// The factory could not build the screen
    Launch(&'static str),
    /// The screen panicked during the named phase
    Panicked(&'static str),
}

impl core::fmt::Display for ScreenFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScreenFault::Update(msg) => write!(f, "update failed: {msg}"),
            ScreenFault::Draw(msg) => write!(f, "draw failed: {msg}"),
            ScreenFault::Handle(msg) => write!(f, "input handling failed: {msg}"),
            ScreenFault::Launch(msg) => write!(f, "launch failed: {msg}"),
            ScreenFault::Panicked(phase) => write!(f, "panicked in {phase}"),
        }
    }
}

// Drawing into a FrameBuffer cannot fail
impl From<Infallible> for ScreenFault {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

/// Navigation requests a screen can make
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Launch an app by id
    Launch(String),
    /// Push the list of one category
    OpenCategory(Category),
    /// Close this screen
    Close,
}

/// Per-call context handed to a screen
///
/// Carries the current time and collects navigation requests, which the
/// runtime applies after the call returns.
#[derive(Debug, Default)]
pub struct Context {
    now_ms: u64,
    requests: Vec<Request>,
}

impl Context {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms,
            requests: Vec::new(),
        }
    }

    /// Milliseconds on the runtime's clock
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn launch(&mut self, id: impl Into<String>) {
        self.requests.push(Request::Launch(id.into()));
    }

    pub fn open_category(&mut self, category: Category) {
        self.requests.push(Request::OpenCategory(category));
    }

    pub fn close(&mut self) {
        self.requests.push(Request::Close);
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn into_requests(self) -> Vec<Request> {
        self.requests
    }
}

/// Trait for everything that can hold focus
pub trait Screen {
    /// Display name, for logs
    fn name(&self) -> &str;

    /// Input this screen listens to while focused
    ///
    /// Events outside these topics are never offered to `handle` and count
    /// as unconsumed. The runtime installs the bindings on focus and clears
    /// them when focus moves.
    fn bindings(&self) -> &'static [Topic] {
        &[Topic::Any]
    }

    /// Advance one tick
    fn update(&mut self, ctx: &mut Context) -> Result<(), ScreenFault>;

    /// Render into the frame, repainting everything this screen owns
    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault>;

    /// Process one event; `Ok(true)` if it was consumed
    fn handle(&mut self, event: LogicalEvent, ctx: &mut Context) -> Result<bool, ScreenFault>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_collects_requests() {
        let mut ctx = Context::new(42);
        ctx.open_category(Category::Tools);
        ctx.launch("torch");
        ctx.close();

        assert_eq!(ctx.now_ms(), 42);
        assert_eq!(
            ctx.into_requests(),
            [
                Request::OpenCategory(Category::Tools),
                Request::Launch(String::from("torch")),
                Request::Close,
            ]
        );
    }

    #[test]
    fn test_fault_display() {
        use alloc::string::ToString;
        assert_eq!(ScreenFault::Panicked("draw").to_string(), "panicked in draw");
    }
}
