//! Menus
//!
//! [`Menu`] is the selection model shared by the runtime's own menus and by
//! apps with internal mode lists. Selection wraps around; the scroll offset
//! eases toward keeping the selected row centred.
//!
//! [`RootMenu`] (category carousel) and [`CategoryMenu`] (app list) are the
//! screens the runtime puts on the stack itself.

use alloc::string::String;
use alloc::vec::Vec;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use handheld_display::FrameBuffer;

use super::registry::{AppRegistry, Category};
use super::screen::{Context, Screen, ScreenFault};
use crate::config::Theme;
use crate::input::LogicalEvent;

/// Row height of list menus
pub const ITEM_HEIGHT: i32 = 50;

/// Fraction of the remaining distance scrolled per update
const SCROLL_EASING: f32 = 0.1;

/// One menu row
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem<A> {
    pub label: String,
    /// `None` renders the row disabled
    pub action: Option<A>,
}

impl<A> MenuItem<A> {
    pub fn new(label: &str, action: A) -> Self {
        Self {
            label: String::from(label),
            action: Some(action),
        }
    }

    pub fn disabled(label: &str) -> Self {
        Self {
            label: String::from(label),
            action: None,
        }
    }
}

/// Selection and scroll state over a list of items
#[derive(Debug, Clone)]
pub struct Menu<A> {
    title: String,
    items: Vec<MenuItem<A>>,
    selected: usize,
    scroll: f32,
    target: f32,
    view_height: i32,
}

impl<A> Menu<A> {
    pub fn new(title: &str, items: Vec<MenuItem<A>>, view_height: u16) -> Self {
        Self {
            title: String::from(title),
            items,
            selected: 0,
            scroll: 0.0,
            target: 0.0,
            view_height: view_height as i32,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[MenuItem<A>] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Action of the selected row, if enabled
    pub fn selected_action(&self) -> Option<&A> {
        self.items.get(self.selected)?.action.as_ref()
    }

    /// Move the selection by `delta` rows, wrapping at both ends
    pub fn move_selection(&mut self, delta: i32) {
        let len = self.items.len() as i32;
        if len == 0 {
            return;
        }
        self.selected = (self.selected as i32 + delta).rem_euclid(len) as usize;
        self.target =
            (self.selected as i32 * ITEM_HEIGHT - self.view_height / 2 + ITEM_HEIGHT / 2) as f32;
    }

    /// Ease the scroll offset toward its target
    pub fn update(&mut self) {
        let diff = self.target - self.scroll;
        if diff > 1.0 || diff < -1.0 {
            self.scroll += diff * SCROLL_EASING;
        } else {
            self.scroll = self.target;
        }
    }

    /// Current scroll offset in pixels
    pub fn scroll_offset(&self) -> i32 {
        self.scroll as i32
    }

    /// Scroll offset the animation is heading for
    pub fn target_offset(&self) -> i32 {
        self.target as i32
    }

    /// Draw as a vertical list with the selected row boxed
    pub fn draw_list(&self, frame: &mut FrameBuffer, theme: &Theme) -> Result<(), ScreenFault> {
        frame.clear(theme.bg())?;
        let width = frame.width() as i32;

        let selected_box = PrimitiveStyleBuilder::new()
            .fill_color(theme.highlight())
            .stroke_color(theme.accent())
            .stroke_width(2)
            .build();

        for (i, item) in self.items.iter().enumerate() {
            let y = i as i32 * ITEM_HEIGHT - self.scroll_offset();
            if y < -ITEM_HEIGHT || y > self.view_height {
                continue;
            }

            let color = if i == self.selected {
                Rectangle::new(
                    Point::new(10, y),
                    Size::new((width - 20).max(0) as u32, (ITEM_HEIGHT - 5) as u32),
                )
                .into_styled(selected_box)
                .draw(frame)?;
                theme.accent()
            } else if item.action.is_none() {
                theme.muted()
            } else {
                theme.fg()
            };

            Text::with_baseline(
                &item.label,
                Point::new(20, y + 12),
                MonoTextStyle::new(&FONT_10X20, color),
                Baseline::Top,
            )
            .draw(frame)?;
        }
        Ok(())
    }

    /// Draw as a carousel: the selected item large in the centre, its
    /// neighbours above and below, and a page indicator
    pub fn draw_carousel(&self, frame: &mut FrameBuffer, theme: &Theme) -> Result<(), ScreenFault> {
        frame.clear(theme.bg())?;
        let len = self.items.len();
        let cx = frame.width() as i32 / 2;
        let cy = frame.height() as i32 / 2;
        let centered = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();

        Text::with_text_style(
            &self.title,
            Point::new(cx, 20),
            MonoTextStyle::new(&FONT_6X10, theme.muted()),
            centered,
        )
        .draw(frame)?;

        if len == 0 {
            return Ok(());
        }

        let card = Rectangle::with_center(Point::new(cx, cy), Size::new(180, 70));
        card.into_styled(
            PrimitiveStyleBuilder::new()
                .fill_color(theme.highlight())
                .stroke_color(theme.accent())
                .stroke_width(2)
                .build(),
        )
        .draw(frame)?;
        Text::with_text_style(
            &self.items[self.selected].label,
            Point::new(cx, cy),
            MonoTextStyle::new(&FONT_10X20, theme.accent()),
            centered,
        )
        .draw(frame)?;

        if len > 1 {
            let prev = (self.selected + len - 1) % len;
            let next = (self.selected + 1) % len;
            let dim = MonoTextStyle::new(&FONT_10X20, theme.muted());
            Text::with_text_style(&self.items[prev].label, Point::new(cx, cy - 70), dim, centered)
                .draw(frame)?;
            Text::with_text_style(&self.items[next].label, Point::new(cx, cy + 70), dim, centered)
                .draw(frame)?;
        }

        // Page dots
        let spacing = 14;
        let first = cx - (len as i32 - 1) * spacing / 2;
        for i in 0..len {
            let style = if i == self.selected {
                PrimitiveStyle::with_fill(theme.accent())
            } else {
                PrimitiveStyle::with_fill(theme.highlight())
            };
            Circle::with_center(
                Point::new(first + i as i32 * spacing, frame.height() as i32 - 24),
                8,
            )
            .into_styled(style)
            .draw(frame)?;
        }
        Ok(())
    }
}

/// Root carousel over the app categories
pub struct RootMenu {
    menu: Menu<Category>,
    theme: Theme,
}

impl RootMenu {
    pub fn new(theme: &Theme, height: u16) -> Self {
        let items = Category::ALL
            .iter()
            .map(|c| MenuItem::new(c.label(), *c))
            .collect();
        Self {
            menu: Menu::new("Main Menu", items, height),
            theme: *theme,
        }
    }

    pub fn menu(&self) -> &Menu<Category> {
        &self.menu
    }
}

impl Screen for RootMenu {
    fn name(&self) -> &str {
        self.menu.title()
    }

    fn update(&mut self, _ctx: &mut Context) -> Result<(), ScreenFault> {
        self.menu.update();
        Ok(())
    }

    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        self.menu.draw_carousel(frame, &self.theme)
    }

    fn handle(&mut self, event: LogicalEvent, ctx: &mut Context) -> Result<bool, ScreenFault> {
        match event {
            LogicalEvent::RotateLeft | LogicalEvent::RotateRight => {
                self.menu.move_selection(event.delta());
                Ok(true)
            }
            LogicalEvent::Tap => {
                if let Some(category) = self.menu.selected_action() {
                    ctx.open_category(*category);
                }
                Ok(true)
            }
            // Left to the runtime: shortcut launch
            LogicalEvent::Hold => Ok(false),
        }
    }
}

/// List of the apps in one category
pub struct CategoryMenu {
    menu: Menu<String>,
    theme: Theme,
}

impl CategoryMenu {
    /// Build the list; an empty category gets one disabled "No Items" row
    pub fn new(category: Category, registry: &AppRegistry, theme: &Theme, height: u16) -> Self {
        let mut items: Vec<MenuItem<String>> = registry
            .in_category(category)
            .map(|app| MenuItem::new(&app.name, app.id.clone()))
            .collect();
        if items.is_empty() {
            items.push(MenuItem::disabled("No Items"));
        }
        Self {
            menu: Menu::new(category.label(), items, height),
            theme: *theme,
        }
    }

    pub fn menu(&self) -> &Menu<String> {
        &self.menu
    }
}

impl Screen for CategoryMenu {
    fn name(&self) -> &str {
        self.menu.title()
    }

    fn update(&mut self, _ctx: &mut Context) -> Result<(), ScreenFault> {
        self.menu.update();
        Ok(())
    }

    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        self.menu.draw_list(frame, &self.theme)
    }

    fn handle(&mut self, event: LogicalEvent, ctx: &mut Context) -> Result<bool, ScreenFault> {
        match event {
            LogicalEvent::RotateLeft | LogicalEvent::RotateRight => {
                self.menu.move_selection(event.delta());
                Ok(true)
            }
            LogicalEvent::Tap => {
                if let Some(id) = self.menu.selected_action() {
                    ctx.launch(id.clone());
                }
                Ok(true)
            }
            // Left to the runtime: back to the carousel
            LogicalEvent::Hold => Ok(false),
        }
    }
}
