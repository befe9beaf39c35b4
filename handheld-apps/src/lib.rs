//! Built-in screens
//!
//! Every app is a [`Screen`](handheld_core::nav::Screen) built by a factory
//! in [`catalog`]. Apps receive the configuration at launch and keep a copy
//! of the theme; they never hold a reference into the runtime.
//!
//! Blocking work (network fetches) runs on detached worker threads that
//! post a finished value into a [`Mailbox`]. The screen drains the mailbox
//! in `update`; a result posted after the screen closed is dropped.

#![deny(unsafe_code)]

pub mod catalog;
pub mod highscores;
pub mod home_assistant;
pub mod mailbox;
pub mod measure;
pub mod settings;
pub mod snake;
pub mod torch;
pub mod weather;

mod widgets;

pub use catalog::registry;
pub use highscores::{HighScoreStore, StoreError};
pub use mailbox::{Mailbox, Poster};
