//! Logging setup: errors go to `errors.log`, chatter optionally to stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{Result, SweepError};

/// Install the global subscriber.
///
/// ERROR events are appended to `error_log`. The file handle sits behind a
/// mutex and each event is written in one call, so concurrent tasks never
/// interleave log lines. With `verbose`, events matching `RUST_LOG` (default
/// `tld_sweep=debug`) are also printed to stderr.
pub fn init(error_log: &Path, verbose: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(error_log)
        .map_err(|e| SweepError::io(e.to_string(), Some(error_log.to_string_lossy().to_string())))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_filter(LevelFilter::ERROR);

    let stderr_layer = verbose.then(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tld_sweep=debug"));

        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_filter(filter)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| SweepError::internal(format!("Failed to initialize logging: {}", e)))
}
