//! Settings: high-score table and about page

use handheld_core::config::Theme;
use handheld_core::input::LogicalEvent;
use handheld_core::nav::{Context, LaunchContext, Menu, MenuItem, Screen, ScreenFault};
use handheld_display::FrameBuffer;

use embedded_graphics::prelude::*;

use crate::highscores::HighScoreStore;
use crate::widgets::{self, title_case, LARGE, SMALL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Menu,
    Highscores,
    About,
}

pub struct Settings {
    page: Page,
    menu: Menu<Page>,
    store: HighScoreStore,
    theme: Theme,
}

impl Settings {
    pub fn new(store: HighScoreStore, theme: &Theme, height: u16) -> Self {
        let items = vec![
            MenuItem::new("Highscores", Page::Highscores),
            MenuItem::new("About", Page::About),
        ];
        Self {
            page: Page::Menu,
            menu: Menu::new("Settings", items, height),
            store,
            theme: *theme,
        }
    }

    pub fn launch(ctx: &LaunchContext<'_>) -> Result<Box<dyn Screen>, ScreenFault> {
        let store = HighScoreStore::new(&ctx.config.highscore_path);
        Ok(Box::new(Self::new(store, &ctx.config.theme, ctx.config.display.height)))
    }

    pub fn page(&self) -> Page {
        self.page
    }

    fn draw_highscores(&self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        frame.clear(self.theme.bg())?;
        widgets::centered(frame, "HIGHSCORES", 20, &LARGE, self.theme.accent())?;
        // Read on every draw so a score set by a game shows up immediately
        let table = self.store.load();
        for (i, (id, score)) in table.iter().enumerate() {
            let line = format!("{}: {}", title_case(id), score);
            widgets::text(frame, &line, 40, 40 + 30 * i as i32, &LARGE, self.theme.fg())?;
        }
        widgets::text(frame, "Back to Return", 60, 280, &SMALL, self.theme.muted())
    }

    fn draw_about(&self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        frame.clear(self.theme.bg())?;
        widgets::centered(frame, "ABOUT", 30, &LARGE, self.theme.accent())?;
        let version = concat!("Handheld v", env!("CARGO_PKG_VERSION"));
        widgets::text(frame, version, 20, 60, &SMALL, self.theme.fg())?;
        widgets::text(frame, "Rotary encoder handheld", 20, 90, &SMALL, self.theme.fg())?;
        widgets::text(frame, "Back to Return", 60, 280, &SMALL, self.theme.muted())
    }
}

impl Screen for Settings {
    fn name(&self) -> &str {
        "Settings"
    }

    fn update(&mut self, _ctx: &mut Context) -> Result<(), ScreenFault> {
        if self.page == Page::Menu {
            self.menu.update();
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        match self.page {
            Page::Menu => self.menu.draw_list(frame, &self.theme),
            Page::Highscores => self.draw_highscores(frame),
            Page::About => self.draw_about(frame),
        }
    }

    fn handle(&mut self, event: LogicalEvent, _ctx: &mut Context) -> Result<bool, ScreenFault> {
        match (self.page, event) {
            (Page::Menu, LogicalEvent::RotateLeft | LogicalEvent::RotateRight) => {
                self.menu.move_selection(event.delta());
                Ok(true)
            }
            (Page::Menu, LogicalEvent::Tap) => {
                if let Some(page) = self.menu.selected_action() {
                    self.page = *page;
                }
                Ok(true)
            }
            (Page::Menu, LogicalEvent::Hold) => Ok(false),
            (_, LogicalEvent::Hold) => {
                self.page = Page::Menu;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
