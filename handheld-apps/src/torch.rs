//! Torch: the whole panel lit white

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use handheld_core::input::{EventKind, LogicalEvent, Topic};
use handheld_core::nav::{Context, LaunchContext, Screen, ScreenFault};
use handheld_display::FrameBuffer;

use crate::widgets::{self, LARGE};

pub struct Torch;

impl Torch {
    pub fn new() -> Self {
        Torch
    }

    pub fn launch(_ctx: &LaunchContext<'_>) -> Result<Box<dyn Screen>, ScreenFault> {
        Ok(Box::new(Torch::new()))
    }
}

impl Default for Torch {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for Torch {
    fn name(&self) -> &str {
        "Torch"
    }

    // Nothing to do but leave
    fn bindings(&self) -> &'static [Topic] {
        &[Topic::Kind(EventKind::Hold)]
    }

    fn update(&mut self, _ctx: &mut Context) -> Result<(), ScreenFault> {
        Ok(())
    }

    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        frame.clear(Rgb888::WHITE)?;
        widgets::text(frame, "Torch On", 10, 10, &LARGE, Rgb888::BLACK)?;
        widgets::text(frame, "Hold Back to Exit", 10, 30, &LARGE, Rgb888::BLACK)
    }

    fn handle(&mut self, _event: LogicalEvent, _ctx: &mut Context) -> Result<bool, ScreenFault> {
        Ok(false)
    }
}
