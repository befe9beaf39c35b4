//! Navigation scenarios driven through the public runtime API

use std::cell::Cell;
use std::rc::Rc;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use handheld_core::config::Config;
use handheld_core::input::LogicalEvent;
use handheld_core::nav::{
    AppDescriptor, AppRegistry, Category, Context, NavState, Runtime, Screen, ScreenFault,
};
use handheld_display::{DisplayPipeline, FrameBuffer, MemoryBackend};

/// Fills the frame with one colour and consumes nothing
struct Solid {
    name: &'static str,
    color: Rgb888,
}

impl Screen for Solid {
    fn name(&self) -> &str {
        self.name
    }

    fn update(&mut self, _ctx: &mut Context) -> Result<(), ScreenFault> {
        Ok(())
    }

    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        frame.clear(self.color)?;
        Ok(())
    }

    fn handle(&mut self, _event: LogicalEvent, _ctx: &mut Context) -> Result<bool, ScreenFault> {
        Ok(false)
    }
}

/// Fails every update
struct BrokenUpdate;

impl Screen for BrokenUpdate {
    fn name(&self) -> &str {
        "broken"
    }

    fn update(&mut self, _ctx: &mut Context) -> Result<(), ScreenFault> {
        Err(ScreenFault::Update("always fails"))
    }

    fn draw(&mut self, frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        frame.clear(Rgb888::MAGENTA)?;
        Ok(())
    }

    fn handle(&mut self, _event: LogicalEvent, _ctx: &mut Context) -> Result<bool, ScreenFault> {
        Ok(true)
    }
}

/// Panics in whichever phase it is told to
#[cfg(feature = "std")]
struct Panicky {
    in_draw: bool,
}

#[cfg(feature = "std")]
impl Screen for Panicky {
    fn name(&self) -> &str {
        "panicky"
    }

    fn update(&mut self, _ctx: &mut Context) -> Result<(), ScreenFault> {
        Ok(())
    }

    fn draw(&mut self, _frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
        if self.in_draw {
            panic!("draw bug");
        }
        Ok(())
    }

    fn handle(&mut self, _event: LogicalEvent, _ctx: &mut Context) -> Result<bool, ScreenFault> {
        panic!("handle bug");
    }
}

fn solid(id: &'static str, color: Rgb888) -> AppDescriptor {
    AppDescriptor::new(id, id, Category::Apps, move |_| {
        Ok(Box::new(Solid { name: id, color }) as Box<dyn Screen>)
    })
}

fn registry() -> AppRegistry {
    let mut registry = AppRegistry::new();
    registry.register(solid("a", Rgb888::RED)).unwrap();
    registry.register(solid("b", Rgb888::GREEN)).unwrap();
    registry.register(solid("c", Rgb888::BLUE)).unwrap();
    registry.register(solid("torch", Rgb888::WHITE)).unwrap();
    registry
        .register(AppDescriptor::new("broken", "Broken", Category::Games, |_| {
            Ok(Box::new(BrokenUpdate) as Box<dyn Screen>)
        }))
        .unwrap();
    registry
        .register(AppDescriptor::new("unbuildable", "Unbuildable", Category::Games, |_| {
            Err(ScreenFault::Launch("missing resource"))
        }))
        .unwrap();
    registry
}

fn runtime() -> Runtime {
    Runtime::new(Config::default(), registry(), || 0u64)
}

fn display() -> DisplayPipeline<MemoryBackend> {
    DisplayPipeline::new(MemoryBackend::new(), 240, 320)
}

fn shown(display: &DisplayPipeline<MemoryBackend>) -> &FrameBuffer {
    display.backend().last_frame().unwrap()
}

#[test]
fn test_n_holds_return_to_root_then_shortcut() {
    let mut rt = runtime();
    for id in ["a", "b", "c"] {
        rt.launch(id).unwrap();
    }
    assert_eq!(rt.depth(), 4);

    for expected in [3, 2, 1] {
        rt.handle_event(LogicalEvent::Hold);
        assert_eq!(rt.depth(), expected);
    }
    assert_eq!(rt.state(), NavState::RootMenu);

    // One more: the shortcut, not an underflow
    rt.handle_event(LogicalEvent::Hold);
    assert_eq!(rt.depth(), 2);
    assert_eq!(rt.active_name(), "torch");
}

#[test]
fn test_shortcut_missing_is_ignored() {
    let config = Config {
        shortcut: Some("not-installed".into()),
        ..Config::default()
    };
    let mut rt = Runtime::new(config, registry(), || 0u64);
    rt.handle_event(LogicalEvent::Hold);
    assert_eq!(rt.depth(), 1);

    let config = Config {
        shortcut: None,
        ..Config::default()
    };
    let mut rt = Runtime::new(config, registry(), || 0u64);
    rt.handle_event(LogicalEvent::Hold);
    assert_eq!(rt.depth(), 1);
}

#[test]
fn test_failing_update_removed_after_one_tick() {
    let mut rt = runtime();
    let mut display = display();
    rt.launch("broken").unwrap();

    rt.tick(&mut display);
    assert_eq!(rt.depth(), 1);
    assert_eq!(rt.faults(), 1);

    // The parent keeps ticking
    for _ in 0..5 {
        rt.tick(&mut display);
    }
    assert_eq!(display.backend().flushes(), 6);
    assert_eq!(rt.faults(), 1);
}

#[test]
fn test_hold_pops_and_root_frame_is_shown() {
    let mut rt = runtime();
    let mut display = display();

    rt.launch("a").unwrap();
    rt.tick(&mut display);
    assert_eq!(shown(&display).pixel(0, 0), Some(Rgb888::RED));

    // A does not consume Hold
    rt.handle_event(LogicalEvent::Hold);
    assert_eq!(rt.depth(), 1);

    rt.tick(&mut display);
    let frame = shown(&display);
    assert_eq!(frame.pixel(0, 0), Some(rt.config().theme.bg()));
    assert!(frame.pixels().iter().all(|p| *p != Rgb888::RED));
}

#[test]
fn test_launch_failure_leaves_stack() {
    let mut rt = runtime();
    rt.launch("a").unwrap();
    assert_eq!(
        rt.launch("unbuildable"),
        Err(ScreenFault::Launch("missing resource"))
    );
    assert_eq!(rt.depth(), 2);
    assert_eq!(rt.active_name(), "a");
    assert_eq!(rt.faults(), 1);
}

#[test]
fn test_menu_navigation_to_app_and_back() {
    let mut rt = runtime();

    // Carousel order: Games, Tools, Apps, Settings
    rt.handle_event(LogicalEvent::RotateRight);
    rt.handle_event(LogicalEvent::RotateRight);
    rt.handle_event(LogicalEvent::Tap);
    assert_eq!(rt.state(), NavState::SubMenu);
    assert_eq!(rt.active_name(), "Apps");

    // Apps list: a, b, c, torch
    rt.handle_event(LogicalEvent::RotateRight);
    rt.handle_event(LogicalEvent::Tap);
    assert_eq!(rt.state(), NavState::RunningScreen);
    assert_eq!(rt.active_name(), "b");

    rt.handle_event(LogicalEvent::Hold);
    assert_eq!(rt.active_name(), "Apps");
    rt.handle_event(LogicalEvent::Hold);
    assert_eq!(rt.state(), NavState::RootMenu);
}

#[test]
fn test_empty_category_placeholder_does_nothing() {
    let mut rt = runtime();
    // Tools is empty in this registry
    rt.handle_event(LogicalEvent::RotateRight);
    rt.handle_event(LogicalEvent::Tap);
    assert_eq!(rt.active_name(), "Tools");

    rt.handle_event(LogicalEvent::Tap);
    assert_eq!(rt.active_name(), "Tools");
    assert_eq!(rt.depth(), 2);
}

#[test]
fn test_clock_reaches_screens() {
    struct Stopwatch {
        seen: Rc<Cell<u64>>,
    }

    impl Screen for Stopwatch {
        fn name(&self) -> &str {
            "stopwatch"
        }
        fn update(&mut self, ctx: &mut Context) -> Result<(), ScreenFault> {
            self.seen.set(ctx.now_ms());
            Ok(())
        }
        fn draw(&mut self, _frame: &mut FrameBuffer) -> Result<(), ScreenFault> {
            Ok(())
        }
        fn handle(&mut self, _event: LogicalEvent, _ctx: &mut Context) -> Result<bool, ScreenFault> {
            Ok(false)
        }
    }

    let now = Rc::new(Cell::new(1_000u64));
    let seen = Rc::new(Cell::new(0u64));

    let mut registry = AppRegistry::new();
    let s = seen.clone();
    registry
        .register(AppDescriptor::new("sw", "SW", Category::Tools, move |_| {
            Ok(Box::new(Stopwatch { seen: s.clone() }) as Box<dyn Screen>)
        }))
        .unwrap();

    let clock = now.clone();
    let mut rt = Runtime::new(Config::default(), registry, move || clock.get());
    let mut display = display();
    rt.launch("sw").unwrap();

    now.set(4_321);
    rt.tick(&mut display);
    assert_eq!(seen.get(), 4_321);
}

#[cfg(feature = "std")]
#[test]
fn test_panic_in_draw_is_contained() {
    let mut registry = registry();
    registry
        .register(AppDescriptor::new("panicky", "Panicky", Category::Games, |_| {
            Ok(Box::new(Panicky { in_draw: true }) as Box<dyn Screen>)
        }))
        .unwrap();
    let mut rt = Runtime::new(Config::default(), registry, || 0u64);
    let mut display = display();

    rt.launch("a").unwrap();
    rt.launch("panicky").unwrap();
    rt.tick(&mut display);

    // Parent drawn in the same tick
    assert_eq!(rt.active_name(), "a");
    assert_eq!(shown(&display).pixel(10, 10), Some(Rgb888::RED));
    assert_eq!(rt.faults(), 1);
}

#[cfg(feature = "std")]
#[test]
fn test_panic_in_handle_is_contained() {
    let mut registry = registry();
    registry
        .register(AppDescriptor::new("panicky", "Panicky", Category::Games, |_| {
            Ok(Box::new(Panicky { in_draw: false }) as Box<dyn Screen>)
        }))
        .unwrap();
    let mut rt = Runtime::new(Config::default(), registry, || 0u64);

    rt.launch("panicky").unwrap();
    rt.handle_event(LogicalEvent::Tap);
    assert_eq!(rt.depth(), 1);
    assert_eq!(rt.faults(), 1);
}
