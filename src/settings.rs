//! Runtime settings.
//!
//! Settings are layered, lowest priority first:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. `ACORN_DASH_*` environment variables (e.g. `ACORN_DASH_ENDPOINT`)
//! 4. command-line flags, applied by the binary on top of the result

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::data::DEFAULT_CAPACITY;
use crate::source::DEFAULT_POLL_INTERVAL;

/// Prefix of the environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "ACORN_DASH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the appliance, e.g. `http://10.0.0.42`. When unset the
    /// dashboard reads snapshots from a file instead.
    pub endpoint: Option<String>,
    /// Poll period, e.g. `"1s"` or `"500ms"`.
    pub refresh: String,
    /// Number of samples kept for the CPU chart.
    pub cpu_window: usize,
    pub log_file: PathBuf,
    /// Show memory regions named `N/A`.
    pub show_hidden_regions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            refresh: format!("{}ms", DEFAULT_POLL_INTERVAL.as_millis()),
            cpu_window: DEFAULT_CAPACITY,
            log_file: PathBuf::from("acorn-dash.log"),
            show_hidden_regions: false,
        }
    }
}

impl Settings {
    /// Load settings from the optional config file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("failed to load settings")?;

        config.try_deserialize().context("invalid settings")
    }

    /// The poll period as a [`Duration`].
    pub fn refresh_interval(&self) -> Result<Duration> {
        let interval = parse_duration(&self.refresh)
            .with_context(|| format!("invalid refresh interval '{}'", self.refresh))?;
        if interval.is_zero() {
            anyhow::bail!("refresh interval must be positive");
        }
        Ok(interval)
    }
}
