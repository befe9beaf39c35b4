//! Startup device selection
//!
//! The panel is tried first unless `--sim` was given. A board without a
//! working panel degrades to the preview window. A missing encoder falls
//! back to terminal keys; a missing motor only loses vibration.

use std::sync::mpsc::{Receiver, SyncSender};
use std::time::Instant;

use anyhow::bail;
use handheld_core::config::Config;
use handheld_core::haptic::{Pulse, Silent};
use handheld_core::input::LogicalEvent;

use crate::output::Output;
use crate::tasks;

pub struct Devices {
    pub output: Output,
    /// Encoder or terminal key events; closes when the user quits
    pub events: Option<Receiver<LogicalEvent>>,
    /// Queue into the haptic worker
    pub haptic: SyncSender<Pulse>,
}

pub fn open(config: &Config, sim: bool, epoch: Instant) -> anyhow::Result<Devices> {
    if sim {
        tracing::info!("preview requested");
    } else {
        #[cfg(all(feature = "hardware", target_os = "linux"))]
        match hardware::open(config, epoch) {
            Ok(devices) => return Ok(devices),
            Err(e) => tracing::warn!(error = %e, "panel unavailable, falling back to preview"),
        }
        #[cfg(not(all(feature = "hardware", target_os = "linux")))]
        tracing::info!("built without hardware support");
    }

    #[cfg(feature = "simulator")]
    {
        use crate::preview::Preview;

        let _ = epoch;
        match Preview::open(config.display.width, config.display.height) {
            Ok(preview) => {
                let (haptic, _) = tasks::haptic::spawn(Silent)?;
                return Ok(Devices {
                    output: Output::Preview(preview),
                    events: None,
                    haptic,
                });
            }
            Err(e) => tracing::error!(error = %e, "preview unavailable"),
        }
    }

    bail!("no display backend available")
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
mod hardware {
    use super::*;
    use anyhow::Context;
    use handheld_hal_linux::Board;
    use std::io::IsTerminal;

    pub fn open(config: &Config, epoch: Instant) -> anyhow::Result<Devices> {
        let mut board = Board::open(&config.pins).context("opening gpio chip")?;
        let panel = board.panel(&config.display).context("bringing up panel")?;

        let events = match board.encoder(&config.input) {
            Ok(knob) => {
                let (rx, _) = tasks::input::spawn(knob, config.input.poll_interval_ms, epoch)?;
                Some(rx)
            }
            Err(e) => {
                tracing::warn!(error = %e, "encoder unavailable");
                keyboard()
            }
        };

        let haptic = match board.motor() {
            Ok(motor) => tasks::haptic::spawn(motor)?.0,
            Err(e) => {
                tracing::warn!(error = %e, "vibration motor unavailable");
                tasks::haptic::spawn(Silent)?.0
            }
        };

        Ok(Devices {
            output: Output::Panel(panel),
            events,
            haptic,
        })
    }

    /// Terminal keys in place of the knob
    fn keyboard() -> Option<Receiver<LogicalEvent>> {
        if !std::io::stdin().is_terminal() {
            tracing::warn!("stdin is not a terminal, no input");
            return None;
        }
        match tasks::keys::spawn() {
            Ok((rx, _)) => {
                tracing::info!("reading keys from the terminal, q quits");
                Some(rx)
            }
            Err(e) => {
                tracing::warn!(error = %e, "terminal keys unavailable, no input");
                None
            }
        }
    }
}
