//! Navigation runtime
//!
//! Owns who receives input. The bottom of the focus stack is the root
//! carousel; category lists and launched apps are pushed on top of it.
//! Every tick the top screen is updated and drawn into the frame buffer,
//! then the frame is flushed.
//!
//! A screen that faults (returns an error or panics) is destroyed and focus
//! returns to its parent, exactly as if it had been closed.

pub mod guard;
pub mod menu;
pub mod registry;
pub mod runtime;
pub mod screen;
pub mod stack;

pub use menu::{CategoryMenu, Menu, MenuItem, RootMenu, ITEM_HEIGHT};
pub use registry::{AppDescriptor, AppRegistry, Category, LaunchContext, RegistryError, ScreenFactory};
pub use runtime::{Clock, Runtime};
pub use screen::{Context, Request, Screen, ScreenFault};
pub use stack::{Entry, FocusStack, NavState};
