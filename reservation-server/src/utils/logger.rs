//! Logging Infrastructure
//!
//! Structured logging via `tracing`. `RUST_LOG` overrides the configured level.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with defaults
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional JSON format and daily file output
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // File output only when the directory already exists
    let appender = log_dir
        .map(Path::new)
        .filter(|p| p.exists())
        .map(|p| tracing_appender::rolling::daily(p, "reservation-server"));

    // try_init: tests may set up logging more than once
    let result = match (appender, json.unwrap_or(false)) {
        (Some(appender), true) => subscriber.json().with_writer(appender).try_init(),
        (Some(appender), false) => subscriber.with_writer(appender).try_init(),
        (None, true) => subscriber.json().try_init(),
        (None, false) => subscriber.try_init(),
    };
    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}
