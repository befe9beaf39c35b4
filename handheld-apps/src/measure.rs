//! Measure: stopwatch and on-screen ruler
//!
//! Opens on a two-item mode menu. `Hold` inside a mode returns to the menu;
//! `Hold` in the menu is left unconsumed so the runtime closes the app.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use handheld_core::config::Theme;
use handheld_core::input::LogicalEvent;
use handheld_core::nav::{Context, LaunchContext, Menu, MenuItem, Screen, ScreenFault};
use handheld_display::FrameBuffer;

use crate::widgets::{self, LARGE, SMALL};

/// Panel pixels per millimetre
pub const PX_PER_MM: f32 = 7.87;

/// Ruler length
const RULER_MM: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Stopwatch,
    Ruler,
}

/// Start/stop timer that accumulates across runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stopwatch {
    /// Time banked by completed runs
    elapsed_ms: u64,
    /// Start of the current run
    started_at: Option<u64>,
}

impl Stopwatch {
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn toggle(&mut self, now_ms: u64) {
        match self.started_at.take() {
            Some(start) => self.elapsed_ms += now_ms.saturating_sub(start),
            None => self.started_at = Some(now_ms),
        }
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        let running = self.started_at.map_or(0, |start| now_ms.saturating_sub(start));
        self.elapsed_ms + running
    }

    /// Seconds with one decimal, e.g. `12.3s`
    pub fn label(&self, now_ms: u64) -> String {
        format!("{:.1}s", self.elapsed_ms(now_ms) as f64 / 1000.0)
    }
}

/// Tick length for a millimetre mark
pub fn tick_length(mm: u32) -> i32 {
    if mm % 10 == 0 {
        20
    } else if mm % 5 == 0 {
        15
    } else {
        10
    }
}

pub struct Measure {
    mode: Mode,
    menu: Menu<Mode>,
    stopwatch: Stopwatch,
    theme: Theme,
    now_ms: u64,
}

impl Measure {
    pub fn new(theme: &Theme, height: u16, now_ms: u64) -> Self {
        let items = vec![
            MenuItem::new("Stopwatch", Mode::Stopwatch),
            MenuItem::new("Ruler", Mode::Ruler),
        ];
        Self {
            mode: Mode::Menu,
            menu: Menu::new("Measure", items, height),
            stopwatch: Stopwatch::default(),
            theme: *theme,
            now_ms,
        }
    }

    pub fn launch(ctx: &LaunchContext<'_>) -> Result<Box<dyn Screen>, ScreenFault> {
        Ok(Box::new(Self::new(
            &ctx.config.theme,
            ctx.config.display.height,
            ctx.now_ms,
        )))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    fn draw_stopwatch(&self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        frame.clear(self.theme.bg())?;
        let label = self.stopwatch.label(self.now_ms);
        widgets::centered(frame, &label, 140, &LARGE, self.theme.fg())?;
        widgets::centered(frame, "Press Select to Start/Stop", 200, &SMALL, self.theme.muted())
    }

    fn draw_ruler(&self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        frame.clear(self.theme.bg())?;
        let width = frame.width() as i32;
        let height = frame.height() as i32;
        let stroke = PrimitiveStyle::with_stroke(self.theme.fg(), 2);

        for mm in 0..RULER_MM {
            let y = (mm as f32 * PX_PER_MM) as i32;
            if y > height {
                break;
            }
            let len = tick_length(mm);
            Line::new(Point::new(0, y), Point::new(len, y))
                .into_styled(stroke)
                .draw(frame)?;
            Line::new(Point::new(width - 1, y), Point::new(width - 1 - len, y))
                .into_styled(stroke)
                .draw(frame)?;
            if mm % 10 == 0 {
                let label = format!("{}cm", mm / 10);
                widgets::text(frame, &label, 30, y - 5, &SMALL, self.theme.fg())?;
            }
        }
        Ok(())
    }
}

impl Screen for Measure {
    fn name(&self) -> &str {
        "Measure"
    }

    fn update(&mut self, ctx: &mut Context) -> Result<(), ScreenFault> {
        self.now_ms = ctx.now_ms();
        if self.mode == Mode::Menu {
            self.menu.update();
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        match self.mode {
            Mode::Menu => self.menu.draw_list(frame, &self.theme),
            Mode::Stopwatch => self.draw_stopwatch(frame),
            Mode::Ruler => self.draw_ruler(frame),
        }
    }

    fn handle(&mut self, event: LogicalEvent, ctx: &mut Context) -> Result<bool, ScreenFault> {
        self.now_ms = ctx.now_ms();
        match (self.mode, event) {
            (Mode::Menu, LogicalEvent::RotateLeft | LogicalEvent::RotateRight) => {
                self.menu.move_selection(event.delta());
                Ok(true)
            }
            (Mode::Menu, LogicalEvent::Tap) => {
                if let Some(mode) = self.menu.selected_action() {
                    self.mode = *mode;
                }
                Ok(true)
            }
            (Mode::Menu, LogicalEvent::Hold) => Ok(false),
            (Mode::Stopwatch, LogicalEvent::Tap) => {
                self.stopwatch.toggle(ctx.now_ms());
                Ok(true)
            }
            (_, LogicalEvent::Hold) => {
                self.mode = Mode::Menu;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure() -> Measure {
        Measure::new(&Theme::default(), 320, 0)
    }

    fn send(m: &mut Measure, event: LogicalEvent, now_ms: u64) -> bool {
        m.handle(event, &mut Context::new(now_ms)).unwrap()
    }

    #[test]
    fn test_stopwatch_accumulates() {
        let mut sw = Stopwatch::default();
        sw.toggle(1_000);
        assert!(sw.is_running());
        assert_eq!(sw.elapsed_ms(2_500), 1_500);
        sw.toggle(3_000);
        assert_eq!(sw.elapsed_ms(10_000), 2_000);
        sw.toggle(20_000);
        assert_eq!(sw.label(20_300), "2.3s");
    }

    #[test]
    fn test_tick_lengths() {
        assert_eq!(tick_length(0), 20);
        assert_eq!(tick_length(10), 20);
        assert_eq!(tick_length(5), 15);
        assert_eq!(tick_length(7), 10);
    }

    #[test]
    fn test_mode_navigation() {
        let mut m = measure();
        assert!(send(&mut m, LogicalEvent::Tap, 0));
        assert_eq!(m.mode(), Mode::Stopwatch);

        // Hold in a mode returns to the menu
        assert!(send(&mut m, LogicalEvent::Hold, 0));
        assert_eq!(m.mode(), Mode::Menu);

        send(&mut m, LogicalEvent::RotateRight, 0);
        send(&mut m, LogicalEvent::Tap, 0);
        assert_eq!(m.mode(), Mode::Ruler);
        assert!(!send(&mut m, LogicalEvent::Tap, 0));
        send(&mut m, LogicalEvent::Hold, 0);

        // Hold in the menu closes the app
        assert!(!send(&mut m, LogicalEvent::Hold, 0));
    }

    #[test]
    fn test_stopwatch_driven_by_taps() {
        let mut m = measure();
        send(&mut m, LogicalEvent::Tap, 0);
        send(&mut m, LogicalEvent::Tap, 1_000);
        send(&mut m, LogicalEvent::Tap, 4_000);
        assert_eq!(m.stopwatch().elapsed_ms(4_000), 3_000);
        assert!(!m.stopwatch().is_running());
    }

    #[test]
    fn test_ruler_draws_ticks_both_edges() {
        let theme = Theme::default();
        let mut m = measure();
        send(&mut m, LogicalEvent::RotateRight, 0);
        send(&mut m, LogicalEvent::Tap, 0);
        let mut frame = FrameBuffer::new(240, 320);
        m.draw(&mut frame).unwrap();

        // 1 cm mark at y = 78
        assert_eq!(frame.pixel(15, 78), Some(theme.fg()));
        assert_eq!(frame.pixel(225, 78), Some(theme.fg()));
        // 1 mm mark at y = 7 is short
        assert_eq!(frame.pixel(5, 7), Some(theme.fg()));
        assert_eq!(frame.pixel(15, 7), Some(theme.bg()));
        assert!(widgets::any_pixel(&frame, 30, 73, 30, 10, theme.fg()));
    }
}
