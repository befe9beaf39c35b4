//! Display abstraction for the handheld runtime
//!
//! This crate provides:
//! - `FrameBuffer`, the RGB canvas every screen draws into
//! - `DisplayBackend` trait for the places a frame can go (ST7789 panel,
//!   desktop preview window, memory snapshot)
//! - `DisplayPipeline`, which owns the frame and its single backend and
//!   turns transport failures into per-flush errors
//!
//! # Architecture
//!
//! Screens only ever see the `FrameBuffer`. Which backend sits behind the
//! pipeline is decided once at startup, so swapping the panel for the
//! preview window is invisible to navigation and to screens.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod backend;
pub mod framebuffer;
pub mod pipeline;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError, MemoryBackend};
pub use framebuffer::FrameBuffer;
pub use pipeline::DisplayPipeline;

/// Panel width in pixels (portrait)
pub const PANEL_WIDTH: u16 = 240;

/// Panel height in pixels (portrait)
pub const PANEL_HEIGHT: u16 = 320;
