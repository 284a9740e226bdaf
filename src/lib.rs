// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # acorn-dash
//!
//! A terminal dashboard and library for monitoring a unikernel web appliance
//! through its status API.
//!
//! The appliance serves a JSON document at `/api/dashboard` with its
//! statistics, CPU usage, memory map, service status, TCP state and recent log
//! lines. This crate polls that document (or reads it from a file, or receives
//! it through a channel) and renders it in an interactive terminal UI.
//!
//! ## Architecture
//!
//! The crate is organized into four main modules:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(processing)   │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── HttpSource | FileSource | ChannelSource    │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with implementations
//!   for HTTP polling, file polling, and channel-based input
//! - **[`data`]**: Data models and processing - builds the [`StatTree`] from the flat
//!   statistics list and keeps the CPU history in a [`TimeSeriesWindow`]
//! - **[`ui`]**: Terminal rendering using ratatui - statistics tree, CPU chart,
//!   memory map, log tail, TCP status, and theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll a running appliance
//! acorn-dash --endpoint http://10.0.0.42
//!
//! # Replay a saved /api/dashboard response
//! acorn-dash --file dashboard.json
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use acorn_dash::{App, FileSource};
//!
//! let source = Box::new(FileSource::new("dashboard.json"));
//! let app = App::new(source, 20).unwrap();
//! ```
//!
//! ### As a library with HTTP source
//!
//! ```no_run
//! use std::time::Duration;
//! use acorn_dash::{App, HttpSource};
//!
//! # tokio_test::block_on(async {
//! let source = HttpSource::spawn("http://10.0.0.42", Duration::from_secs(1)).unwrap();
//! let app = App::new(Box::new(source), 20).unwrap();
//! # });
//! ```
//!
//! ### The pure building blocks
//!
//! ```
//! use std::time::Instant;
//! use acorn_dash::{MetricSample, StatTree, TimeSeriesWindow};
//!
//! let samples = vec![
//!     MetricSample::new("net.recv", 10i64),
//!     MetricSample::new("net.sent", 20i64),
//! ];
//! let tree = StatTree::build(&samples).unwrap();
//! assert_eq!(tree.nodes()[0].label(), "net");
//!
//! let mut window = TimeSeriesWindow::configure(["total", "active"], 3).unwrap();
//! window.push(Instant::now(), [("total", 100.0), ("active", 42.0)]).unwrap();
//! assert_eq!(window.snapshot().len(), 1);
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod logging;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use data::{
    CpuSample, DashboardData, MemoryRegion, StatTree, StatTreeError, TimeSeriesWindow, TreeNode,
    WindowError, WindowSnapshot,
};
pub use settings::Settings;
pub use source::{
    ChannelSource, CpuUsage, DashboardSnapshot, DataSource, FileSource, HttpSource,
    MemmapEntry, MetricSample, MetricValue, ServiceStatus, SourceError, StatusClient,
};
