//! Encoder polling thread
//!
//! Samples the encoder lines at the configured interval and forwards
//! decoded events to the tick loop over a channel. Pin read failures are
//! logged once per streak and polling continues.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use embedded_hal::digital::InputPin;
use handheld_core::input::LogicalEvent;
use handheld_drivers::input::Encoder;
use handheld_drivers::DriverError;

/// Anything that yields events when polled
pub trait Poll {
    fn poll_events(&mut self, now_ms: u64) -> Result<Vec<LogicalEvent>, DriverError>;
}

impl<A: InputPin, B: InputPin, S: InputPin> Poll for Encoder<A, B, S> {
    fn poll_events(&mut self, now_ms: u64) -> Result<Vec<LogicalEvent>, DriverError> {
        Ok(self.poll(now_ms)?.into_iter().collect())
    }
}

/// Start polling; the thread exits once the receiver is dropped
pub fn spawn<P>(
    source: P,
    interval_ms: u32,
    epoch: Instant,
) -> std::io::Result<(Receiver<LogicalEvent>, JoinHandle<()>)>
where
    P: Poll + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let interval = Duration::from_millis(interval_ms.max(1) as u64);
    let handle = thread::Builder::new()
        .name("encoder-poll".into())
        .spawn(move || run(source, interval, epoch, tx))?;
    Ok((rx, handle))
}

fn run<P: Poll>(mut source: P, interval: Duration, epoch: Instant, tx: Sender<LogicalEvent>) {
    tracing::debug!(interval_ms = interval.as_millis() as u64, "encoder polling started");
    let mut failing = false;
    loop {
        let now_ms = epoch.elapsed().as_millis() as u64;
        match source.poll_events(now_ms) {
            Ok(events) => {
                if failing {
                    tracing::info!("encoder reads recovered");
                    failing = false;
                }
                for event in events {
                    tracing::trace!(?event, "input");
                    if tx.send(event).is_err() {
                        tracing::debug!("event receiver gone, encoder polling stopped");
                        return;
                    }
                }
            }
            Err(e) => {
                if !failing {
                    tracing::warn!(error = %e, "encoder read failed");
                    failing = true;
                }
            }
        }
        thread::sleep(interval);
    }
}
