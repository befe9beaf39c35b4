//! Haptic worker thread
//!
//! Pulses block for their whole length, so they run here instead of on
//! the tick loop. The queue is small and bounded: when it is full a new
//! pulse is dropped rather than delaying input.

use std::fmt::Display;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use handheld_core::haptic::{HapticOutput, HapticPolicy, Pulse};
use handheld_core::input::LogicalEvent;

/// Pulses waiting to play
pub const QUEUE_DEPTH: usize = 4;

/// Start the worker; it exits when every sender is dropped
pub fn spawn<H>(output: H) -> std::io::Result<(SyncSender<Pulse>, JoinHandle<()>)>
where
    H: HapticOutput + Send + 'static,
    H::Error: Display,
{
    let (tx, rx) = mpsc::sync_channel(QUEUE_DEPTH);
    let handle = thread::Builder::new()
        .name("haptic".into())
        .spawn(move || run(output, rx))?;
    Ok((tx, handle))
}

fn run<H>(mut output: H, rx: Receiver<Pulse>)
where
    H: HapticOutput,
    H::Error: Display,
{
    tracing::debug!("haptic worker started");
    for pulse in rx {
        if let Err(e) = output.pulse(pulse) {
            tracing::warn!(error = %e, "haptic pulse failed");
        }
    }
    tracing::debug!("haptic worker stopped");
}

/// Event-bus handler that queues the policy's pulse for each event
pub fn subscriber(policy: HapticPolicy, tx: SyncSender<Pulse>) -> impl FnMut(LogicalEvent) {
    move |event| {
        let Some(pulse) = policy.pulse_for(event) else {
            return;
        };
        match tx.try_send(pulse) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => tracing::trace!(?event, "haptic busy, pulse dropped"),
            Err(TrySendError::Disconnected(_)) => tracing::trace!("haptic worker gone"),
        }
    }
}
