//! Display pipeline
//!
//! Owns the frame buffer and the one backend it is flushed to. A failed
//! flush is reported for that tick only; the pipeline stays usable and the
//! next tick sends a fresh frame.

use alloc::boxed::Box;

use crate::backend::{DisplayBackend, DisplayError};
use crate::framebuffer::FrameBuffer;

/// Frame buffer plus its output
pub struct DisplayPipeline<B = Box<dyn DisplayBackend>> {
    frame: FrameBuffer,
    backend: B,
    /// Flush failures since the last success
    consecutive_failures: u32,
    /// Total successful flushes
    frames: u64,
}

impl<B: DisplayBackend> DisplayPipeline<B> {
    /// Create a pipeline with a black `width` x `height` frame
    pub fn new(backend: B, width: u16, height: u16) -> Self {
        tracing::info!(backend = backend.name(), width, height, "display pipeline ready");
        Self {
            frame: FrameBuffer::new(width, height),
            backend,
            consecutive_failures: 0,
            frames: 0,
        }
    }

    /// The frame as last drawn
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// The frame, for the active screen to draw into
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Flushes that have failed in a row
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Frames delivered successfully
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Send the current frame to the backend
    ///
    /// The first failure of a run and the eventual recovery are logged;
    /// repeats in between are not.
    pub fn flush(&mut self) -> Result<(), DisplayError> {
        match self.backend.flush(&self.frame) {
            Ok(()) => {
                if self.consecutive_failures > 0 {
                    tracing::info!(
                        backend = self.backend.name(),
                        failed = self.consecutive_failures,
                        "display flush recovered"
                    );
                }
                self.consecutive_failures = 0;
                self.frames += 1;
                Ok(())
            }
            Err(e) => {
                if self.consecutive_failures == 0 {
                    tracing::warn!(backend = self.backend.name(), error = %e, "display flush failed");
                }
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                Err(e)
            }
        }
    }
}
