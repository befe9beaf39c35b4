//! Desktop preview window
//!
//! Stands in for the panel and the encoder when no hardware is present.
//! Frames are copied into a simulator display; arrow keys, Enter, Escape
//! and Backspace feed the same events the knob would.

use std::panic::{self, AssertUnwindSafe};

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use handheld_core::input::Key;
use handheld_display::{DisplayBackend, DisplayError, FrameBuffer};

const TITLE: &str = "Handheld Preview";

/// Keys pressed since the last poll, and whether the window was closed
#[derive(Debug, Default)]
pub struct Polled {
    pub keys: Vec<Key>,
    pub quit: bool,
}

pub struct Preview {
    display: SimulatorDisplay<Rgb888>,
    window: Window,
}

impl Preview {
    /// Open the window
    ///
    /// SDL panics when no video device exists; that is reported as
    /// `HardwareUnavailable` instead.
    pub fn open(width: u16, height: u16) -> Result<Self, DisplayError> {
        let display = SimulatorDisplay::new(Size::new(width as u32, height as u32));
        let settings = OutputSettingsBuilder::new().scale(1).build();
        let mut window = Window::new(TITLE, &settings);

        let shown = survives(|| window.update(&display));
        if !shown {
            tracing::warn!("preview window could not be opened");
            return Err(DisplayError::HardwareUnavailable);
        }
        tracing::info!(width, height, "preview window open");
        Ok(Self { display, window })
    }

    /// Drain window events
    pub fn poll(&mut self) -> Polled {
        let mut polled = Polled::default();
        for event in self.window.events() {
            match event {
                SimulatorEvent::Quit => polled.quit = true,
                SimulatorEvent::KeyDown { keycode, repeat, .. } if !repeat => {
                    polled.keys.push(key_for(&keycode.name()));
                }
                _ => {}
            }
        }
        polled
    }
}

/// Run `f`, reporting a panic as failure
fn survives(f: impl FnOnce()) -> bool {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let ok = panic::catch_unwind(AssertUnwindSafe(f)).is_ok();
    panic::set_hook(hook);
    ok
}

/// Translate an SDL key name
fn key_for(name: &str) -> Key {
    match name {
        "Left" => Key::Left,
        "Right" => Key::Right,
        "Return" | "Keypad Enter" => Key::Enter,
        "Escape" => Key::Escape,
        "Backspace" => Key::Backspace,
        _ => Key::Other,
    }
}

impl DisplayBackend for Preview {
    fn flush(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let size = self.display.size();
        if frame.width() as u32 != size.width || frame.height() as u32 != size.height {
            return Err(DisplayError::InvalidDimensions);
        }
        let area = Rectangle::new(Point::zero(), size);
        // Infallible
        let _ = self.display.fill_contiguous(&area, frame.pixels().iter().copied());
        self.window.update(&self.display);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "preview"
    }
}
