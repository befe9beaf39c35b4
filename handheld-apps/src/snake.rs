//! Snake
//!
//! [`SnakeGame`] is the board model and knows nothing about time or
//! drawing. [`Snake`] is the screen: it steps the model on its own
//! interval, turns on rotation and records the score when the game ends.

use std::collections::VecDeque;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use handheld_core::config::Theme;
use handheld_core::input::LogicalEvent;
use handheld_core::nav::{Context, LaunchContext, Screen, ScreenFault};
use handheld_display::FrameBuffer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::highscores::HighScoreStore;
use crate::widgets::{self, LARGE, SMALL};

/// High-score id
pub const GAME_ID: &str = "snake";

/// Cell edge in pixels
pub const CELL: i32 = 10;

const START_STEP_MS: f32 = 150.0;
const MIN_STEP_MS: f32 = 50.0;
const SPEEDUP: f32 = 0.98;

pub type Cell = (i32, i32);

/// Result of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    Ate,
    Crashed,
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    cols: i32,
    rows: i32,
    /// Tail first, head last
    body: VecDeque<Cell>,
    direction: Cell,
    food: Cell,
    score: i64,
    over: bool,
    step_ms: f32,
    rng: StdRng,
}

impl SnakeGame {
    pub fn new(cols: i32, rows: i32, seed: u64) -> Self {
        let mut game = Self {
            cols,
            rows,
            body: VecDeque::new(),
            direction: (0, -1),
            food: (0, 0),
            score: 0,
            over: false,
            step_ms: START_STEP_MS,
            rng: StdRng::seed_from_u64(seed),
        };
        game.reset();
        game
    }

    /// Start over: three cells heading up
    pub fn reset(&mut self) {
        self.body = VecDeque::from([(10, 12), (10, 11), (10, 10)]);
        self.direction = (0, -1);
        self.score = 0;
        self.over = false;
        self.step_ms = START_STEP_MS;
        self.place_food();
    }

    pub fn head(&self) -> Cell {
        self.body.back().copied().unwrap_or((0, 0))
    }

    pub fn body(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Cell {
        self.direction
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Current step interval
    pub fn step_ms(&self) -> u64 {
        self.step_ms as u64
    }

    /// Quarter turn counter-clockwise
    pub fn turn_left(&mut self) {
        let (x, y) = self.direction;
        self.direction = (y, -x);
    }

    /// Quarter turn clockwise
    pub fn turn_right(&mut self) {
        let (x, y) = self.direction;
        self.direction = (-y, x);
    }

    /// Advance one cell
    pub fn step(&mut self) -> Step {
        if self.over {
            return Step::Crashed;
        }
        let (hx, hy) = self.head();
        let next = (hx + self.direction.0, hy + self.direction.1);

        let off_board = next.0 < 0 || next.0 >= self.cols || next.1 < 0 || next.1 >= self.rows;
        if off_board || self.body.contains(&next) {
            self.over = true;
            return Step::Crashed;
        }

        self.body.push_back(next);
        if next == self.food {
            self.score += 1;
            self.step_ms = (self.step_ms * SPEEDUP).max(MIN_STEP_MS);
            self.place_food();
            Step::Ate
        } else {
            self.body.pop_front();
            Step::Moved
        }
    }

    /// Put food on a random free cell; a full board ends the game
    fn place_food(&mut self) {
        for _ in 0..64 {
            let cell = (
                self.rng.gen_range(0..self.cols.max(1)),
                self.rng.gen_range(0..self.rows.max(1)),
            );
            if !self.body.contains(&cell) {
                self.food = cell;
                return;
            }
        }
        let free = (0..self.rows)
            .flat_map(|y| (0..self.cols).map(move |x| (x, y)))
            .find(|cell| !self.body.contains(cell));
        match free {
            Some(cell) => self.food = cell,
            None => self.over = true,
        }
    }
}

pub struct Snake {
    game: SnakeGame,
    store: HighScoreStore,
    best: i64,
    last_step: u64,
    theme: Theme,
}

impl Snake {
    pub fn new(game: SnakeGame, store: HighScoreStore, theme: &Theme, now_ms: u64) -> Self {
        let best = store.get(GAME_ID);
        Self {
            game,
            store,
            best,
            last_step: now_ms,
            theme: *theme,
        }
    }

    pub fn launch(ctx: &LaunchContext<'_>) -> Result<Box<dyn Screen>, ScreenFault> {
        let cols = ctx.config.display.width as i32 / CELL;
        let rows = ctx.config.display.height as i32 / CELL;
        let game = SnakeGame::new(cols, rows, ctx.now_ms);
        let store = HighScoreStore::new(&ctx.config.highscore_path);
        Ok(Box::new(Self::new(game, store, &ctx.config.theme, ctx.now_ms)))
    }

    pub fn game(&self) -> &SnakeGame {
        &self.game
    }

    pub fn best(&self) -> i64 {
        self.best
    }

    fn game_over(&mut self) {
        let score = self.game.score();
        tracing::info!(score, "snake game over");
        if let Err(e) = self.store.record(GAME_ID, score) {
            tracing::warn!(error = %e, "snake score not saved");
        }
        self.best = self.best.max(self.store.get(GAME_ID)).max(score);
    }

    fn cell(&self, frame: &mut FrameBuffer, (x, y): Cell, color: Rgb888) -> Result<(), ScreenFault> {
        Rectangle::new(Point::new(x * CELL, y * CELL), Size::new(CELL as u32, CELL as u32))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(frame)?;
        Ok(())
    }

    fn draw_board(&self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        for segment in self.game.body() {
            self.cell(frame, segment, self.theme.accent())?;
        }
        self.cell(frame, self.game.food(), self.theme.warning())?;
        let score = format!("Score: {}", self.game.score());
        widgets::text(frame, &score, 5, 5, &SMALL, self.theme.fg())
    }

    fn draw_game_over(&self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        widgets::text(frame, "GAME OVER", 60, 100, &LARGE, self.theme.warning())?;
        let score = format!("Score: {}", self.game.score());
        widgets::text(frame, &score, 70, 140, &LARGE, self.theme.fg())?;
        let best = format!("High: {}", self.best);
        widgets::text(frame, &best, 40, 180, &LARGE, self.theme.accent())?;
        widgets::text(frame, "Press Select to Restart", 50, 240, &SMALL, self.theme.muted())?;
        widgets::text(frame, "Hold Back to Exit", 60, 260, &SMALL, self.theme.muted())
    }
}

impl Screen for Snake {
    fn name(&self) -> &str {
        "Snake"
    }

    fn update(&mut self, ctx: &mut Context) -> Result<(), ScreenFault> {
        if self.game.is_over() {
            return Ok(());
        }
        let now = ctx.now_ms();
        if now.saturating_sub(self.last_step) < self.game.step_ms() {
            return Ok(());
        }
        self.last_step = now;
        if self.game.step() == Step::Crashed {
            self.game_over();
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        frame.clear(self.theme.bg())?;
        if self.game.is_over() {
            self.draw_game_over(frame)
        } else {
            self.draw_board(frame)
        }
    }

    fn handle(&mut self, event: LogicalEvent, ctx: &mut Context) -> Result<bool, ScreenFault> {
        match event {
            LogicalEvent::RotateLeft if !self.game.is_over() => self.game.turn_left(),
            LogicalEvent::RotateRight if !self.game.is_over() => self.game.turn_right(),
            LogicalEvent::Tap if self.game.is_over() => {
                self.game.reset();
                self.last_step = ctx.now_ms();
            }
            LogicalEvent::Hold => return Ok(false),
            _ => {}
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store(name: &str) -> HighScoreStore {
        let path = std::env::temp_dir().join(format!("handheld-snake-{}-{}.json", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        HighScoreStore::new(path)
    }

    #[test]
    fn test_starts_heading_up() {
        let game = SnakeGame::new(24, 32, 1);
        assert_eq!(game.body().collect::<Vec<_>>(), [(10, 12), (10, 11), (10, 10)]);
        assert_eq!(game.head(), (10, 10));
        assert_eq!(game.direction(), (0, -1));
        assert_eq!(game.step_ms(), 150);
    }

    #[test]
    fn test_relative_turns() {
        let mut game = SnakeGame::new(24, 32, 1);
        game.turn_left();
        assert_eq!(game.direction(), (-1, 0));
        game.turn_left();
        assert_eq!(game.direction(), (0, 1));
        game.turn_right();
        game.turn_right();
        game.turn_right();
        assert_eq!(game.direction(), (1, 0));
    }

    #[test]
    fn test_wall_ends_game() {
        let mut game = SnakeGame::new(24, 32, 1);
        game.food = (0, 31);
        for _ in 0..10 {
            assert_eq!(game.step(), Step::Moved);
        }
        assert_eq!(game.head(), (10, 0));
        assert_eq!(game.step(), Step::Crashed);
        assert!(game.is_over());
        assert_eq!(game.len(), 3);
    }

    #[test]
    fn test_eating_grows_and_speeds_up() {
        let mut game = SnakeGame::new(24, 32, 7);
        game.food = (10, 9);
        assert_eq!(game.step(), Step::Ate);
        assert_eq!(game.score(), 1);
        assert_eq!(game.len(), 4);
        assert_eq!(game.step_ms(), 147);
        assert!(!game.body().any(|c| c == game.food()));
    }

    #[test]
    fn test_self_collision() {
        let mut game = SnakeGame::new(24, 32, 3);
        game.food = (10, 9);
        game.step();
        game.food = (10, 8);
        game.step();
        game.food = (0, 31);
        // Body (10,12)..(10,8); curl back into it
        game.turn_right();
        game.step();
        game.turn_right();
        game.step();
        game.turn_right();
        assert_eq!(game.step(), Step::Crashed);
    }

    #[test]
    fn test_speed_floor() {
        let mut game = SnakeGame::new(24, 32, 1);
        game.step_ms = 50.5;
        game.food = (10, 9);
        game.step();
        assert_eq!(game.step_ms(), 50);
    }

    #[test]
    fn test_screen_steps_on_interval() {
        let mut snake = Snake::new(SnakeGame::new(24, 32, 1), store("interval"), &Theme::default(), 0);
        snake.game.food = (0, 31);
        snake.update(&mut Context::new(100)).unwrap();
        assert_eq!(snake.game().head(), (10, 10));
        snake.update(&mut Context::new(150)).unwrap();
        assert_eq!(snake.game().head(), (10, 9));
    }

    #[test]
    fn test_crash_records_high_score() {
        let store = store("crash");
        let mut snake = Snake::new(SnakeGame::new(24, 32, 1), store.clone(), &Theme::default(), 0);
        snake.game.score = 9;
        snake.game.food = (0, 31);
        let mut now = 0;
        while !snake.game().is_over() {
            now += 150;
            snake.update(&mut Context::new(now)).unwrap();
        }
        assert_eq!(store.get(GAME_ID), 9);
        assert_eq!(snake.best(), 9);

        let mut frame = FrameBuffer::new(240, 320);
        snake.draw(&mut frame).unwrap();
        let theme = Theme::default();
        assert!(widgets::any_pixel(&frame, 60, 100, 90, 20, theme.warning()));

        // Tap restarts, hold is left for the runtime
        let mut ctx = Context::new(now);
        assert_eq!(snake.handle(LogicalEvent::Tap, &mut ctx), Ok(true));
        assert!(!snake.game().is_over());
        assert_eq!(snake.game().score(), 0);
        assert_eq!(snake.handle(LogicalEvent::Hold, &mut ctx), Ok(false));
        let _ = std::fs::remove_file(store.path());
    }

    proptest! {
        #[test]
        fn prop_food_never_on_body(seed in any::<u64>(), turns in prop::collection::vec(0u8..3, 0..200)) {
            let mut game = SnakeGame::new(24, 32, seed);
            for t in turns {
                match t {
                    0 => game.turn_left(),
                    1 => game.turn_right(),
                    _ => {}
                }
                if game.step() == Step::Crashed {
                    break;
                }
                prop_assert!(!game.body().any(|c| c == game.food()));
                prop_assert!(game.step_ms() >= 50);
            }
        }
    }
}
