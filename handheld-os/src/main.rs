//! Handheld runtime
//!
//! One knob, one panel, a stack of screens.
//!
//! Startup order:
//! - logging (stdout + handheld.log)
//! - configuration (handheld.toml, config.json, or defaults)
//! - devices: ST7789 panel with encoder and motor, or the preview window
//! - worker threads: encoder polling (or terminal keys), haptic pulses
//!
//! The tick loop then runs on the main thread: drain input, route each event
//! through the haptic bus and the navigation runtime, draw, flush, sleep.

mod config;
mod devices;
mod logging;
mod output;
#[cfg(feature = "simulator")]
mod preview;
mod tasks;

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use clap::Parser;
use handheld_core::haptic::HapticPolicy;
use handheld_core::input::{EventBus, LogicalEvent, Topic};
use handheld_core::nav::Runtime;
use handheld_display::{DisplayBackend, DisplayPipeline};

use output::Output;

/// Rotary-encoder handheld runtime
#[derive(Parser, Debug)]
#[command(name = "handheld")]
#[command(version)]
#[command(about = "Rotary-encoder handheld runtime", long_about = None)]
struct Cli {
    /// Use the preview window even when a panel is wired up
    #[arg(long)]
    sim: bool,

    /// Configuration file (.toml or .json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for handheld.log
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

type Handler = Box<dyn FnMut(LogicalEvent)>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_dir.as_deref());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "handheld starting");

    let (config, source) = config::load(cli.config.as_deref())?;
    tracing::info!(?source, tick_ms = config.tick_ms, "configuration loaded");

    let epoch = Instant::now();
    let devices::Devices {
        output,
        events,
        haptic,
    } = devices::open(&config, cli.sim, epoch)?;
    tracing::info!(backend = output.name(), "display ready");

    let mut bus: EventBus<Handler> = EventBus::default();
    bus.subscribe(
        Topic::Any,
        Box::new(tasks::haptic::subscriber(HapticPolicy::new(&config.haptic), haptic)),
    );

    let tick = Duration::from_millis(config.tick_ms.max(1) as u64);
    let mut pipeline = DisplayPipeline::new(output, config.display.width, config.display.height);
    let registry = handheld_apps::registry().map_err(|e| anyhow!("registering apps: {}", e))?;
    tracing::info!(apps = registry.len(), "apps registered");
    let mut runtime = Runtime::new(config, registry, move || epoch.elapsed().as_millis() as u64);

    let mut pending = Vec::new();
    while gather(events.as_ref(), pipeline.backend_mut(), &mut pending) {
        let started = Instant::now();
        for event in pending.drain(..) {
            bus.publish(event);
            runtime.handle_event(event);
        }
        runtime.tick(&mut pipeline);

        if let Some(rest) = tick.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    pipeline.backend_mut().shutdown();
    tracing::info!(
        frames = pipeline.frames(),
        faults = runtime.faults(),
        "handheld stopped"
    );
    Ok(())
}

/// Collect input since the last tick
///
/// Returns false once the preview window has been closed or the input
/// channel has hung up.
fn gather(
    events: Option<&Receiver<LogicalEvent>>,
    output: &mut Output,
    pending: &mut Vec<LogicalEvent>,
) -> bool {
    if let Some(rx) = events {
        if !drain(rx, pending) {
            tracing::info!("input closed");
            return false;
        }
    }

    #[cfg(feature = "simulator")]
    if let Some(preview) = output.preview_mut() {
        let polled = preview.poll();
        if polled.quit {
            tracing::info!("preview window closed");
            return false;
        }
        pending.extend(
            polled
                .keys
                .into_iter()
                .filter_map(handheld_core::input::map_key),
        );
    }
    #[cfg(not(feature = "simulator"))]
    let _ = output;

    true
}

/// Move queued events into `pending`; false when the sender is gone
fn drain(rx: &Receiver<LogicalEvent>, pending: &mut Vec<LogicalEvent>) -> bool {
    loop {
        match rx.try_recv() {
            Ok(event) => pending.push(event),
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}
