//! Logging setup
//!
//! Always logs to stdout. Also writes `handheld.log` through a
//! non-blocking appender into the first writable directory of: the
//! requested one (or the working directory), then the system temp
//! directory. `RUST_LOG` overrides the default `info` filter.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE: &str = "handheld.log";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber
///
/// The returned guard flushes the file writer when dropped and must live
/// until the end of `main`.
pub fn init(dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let requested = dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    match log_dir(&requested) {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            tracing::info!(path = %dir.join(LOG_FILE).display(), "logging to file");
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            tracing::warn!("no writable log directory, logging to stdout only");
            None
        }
    }
}

/// First candidate directory where the log file can be opened
fn log_dir(requested: &Path) -> Option<PathBuf> {
    [requested.to_path_buf(), std::env::temp_dir()]
        .into_iter()
        .find(|dir| writable(dir))
}

fn writable(dir: &Path) -> bool {
    std::fs::create_dir_all(dir).is_ok()
        && OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
            .is_ok()
}
