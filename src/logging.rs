//! Tracing setup.
//!
//! The TUI owns the terminal, so log output goes to a file. The filter is taken
//! from `ACORN_DASH_LOG`, then `RUST_LOG`, and defaults to `info`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn env_filter() -> EnvFilter {
    std::env::var("ACORN_DASH_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new("info"),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new("info")),
        )
}

/// Install the global subscriber, appending to `log_file`.
///
/// Fails only if the log file cannot be opened. Calling it again once a
/// subscriber is installed leaves the first one in place.
pub fn init_logging(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
    Ok(())
}
