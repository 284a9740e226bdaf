//! Data source abstraction for receiving dashboard snapshots.
//!
//! This module provides a trait-based abstraction for receiving dashboard data
//! from various sources (the appliance's HTTP API, a JSON file on disk, or an
//! in-memory channel).

mod channel;
mod error;
mod file;
mod http;
mod snapshot;

pub use channel::ChannelSource;
pub use error::SourceError;
pub use file::FileSource;
pub use http::{HttpSource, StatusClient, DEFAULT_POLL_INTERVAL};
pub use snapshot::{
    CpuUsage, DashboardSnapshot, MemmapEntry, MetricSample, MetricValue, ServiceStatus,
};

use std::fmt::Debug;

/// Trait for receiving dashboard snapshots from various sources.
///
/// Implementations provide snapshots from different backends: HTTP polling,
/// file polling, or in-memory channels.
///
/// # Example
///
/// ```
/// use acorn_dash::{DataSource, FileSource};
///
/// let mut source = FileSource::new("dashboard.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} statistics", snapshot.statman.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<DashboardSnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The error from the most recent failed poll, if the source is
    /// currently failing.
    fn error(&self) -> Option<String>;

    /// A memory map fetched separately from the snapshots.
    ///
    /// Returns it once when it becomes available. Sources without a dedicated
    /// memory map endpoint keep the default.
    fn memmap(&mut self) -> Option<Vec<MemmapEntry>> {
        None
    }
}
