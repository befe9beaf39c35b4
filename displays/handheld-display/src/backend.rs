//! Display backend trait
//!
//! Defines the interface for the places a finished frame can be sent.

use crate::framebuffer::FrameBuffer;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Bus write failed mid-frame; the next flush starts over
    Transport,
    /// The panel (or preview surface) could not be brought up
    HardwareUnavailable,
    /// Frame size does not match what the backend drives
    InvalidDimensions,
    /// Flush attempted before initialization
    NotInitialized,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::Transport => f.write_str("display transport error"),
            DisplayError::HardwareUnavailable => f.write_str("display hardware unavailable"),
            DisplayError::InvalidDimensions => f.write_str("frame size does not match display"),
            DisplayError::NotInitialized => f.write_str("display not initialized"),
        }
    }
}

/// Display backend trait
///
/// Provides a hardware-agnostic sink for whole frames. Implementations
/// own their transport exclusively; nothing else touches the bus.
pub trait DisplayBackend {
    /// Send the frame to the output
    ///
    /// A failed flush leaves the backend usable; the caller retries with the
    /// next frame.
    fn flush(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError>;

    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Check if the backend is ready to accept frames
    fn is_ready(&self) -> bool {
        true
    }
}

impl<B: DisplayBackend + ?Sized> DisplayBackend for alloc::boxed::Box<B> {
    fn flush(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        (**self).flush(frame)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Headless backend that keeps a copy of the last flushed frame
///
/// Used when frames only need to be inspected, not shown.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    last: Option<FrameBuffer>,
    flushes: u32,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently flushed frame
    pub fn last_frame(&self) -> Option<&FrameBuffer> {
        self.last.as_ref()
    }

    /// Number of successful flushes
    pub fn flushes(&self) -> u32 {
        self.flushes
    }
}

impl DisplayBackend for MemoryBackend {
    fn flush(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        match &mut self.last {
            Some(last) if last.width() == frame.width() && last.height() == frame.height() => {
                last.clone_from(frame);
            }
            _ => self.last = Some(frame.clone()),
        }
        self.flushes += 1;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
