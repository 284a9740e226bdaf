//! Data models and processing for dashboard snapshots.
//!
//! This module turns raw dashboard snapshots into structured data suitable
//! for display. The two stateful-looking pieces are deliberately small:
//!
//! - [`stat_tree`]: builds a fresh [`StatTree`] from the flat statistics list
//!   on every poll
//! - [`window`]: the fixed-capacity [`TimeSeriesWindow`] behind the CPU chart
//!
//! ## Submodules
//!
//! - [`cpu`]: Derivation of chart series from raw CPU usage
//! - [`dashboard`]: Processed [`DashboardData`] and JSON export
//! - [`duration`]: Duration parsing and uptime formatting
//! - [`memmap`]: Memory regions with size and usage
//! - [`status`]: Boot time and uptime for the service status block
//! - [`tcp`]: Flattening of the TCP status block
//! - [`units`]: Byte and count formatting
//!
//! ## Data Flow
//!
//! ```text
//! DashboardSnapshot (raw JSON)
//!        │
//!        ▼
//! DashboardData::from_snapshot()
//!        │
//!        ├──▶ StatTree::build()         (fresh tree, or an error)
//!        │
//!        └──▶ CpuSample::from_usage()  ──▶ TimeSeriesWindow::push()
//! ```

pub mod cpu;
pub mod dashboard;
pub mod duration;
pub mod memmap;
pub mod stat_tree;
pub mod status;
pub mod tcp;
pub mod units;
pub mod window;

pub use cpu::{CpuMode, CpuSample, CPU_SERIES};
pub use dashboard::DashboardData;
pub use memmap::MemoryRegion;
pub use stat_tree::{MetricSample, MetricValue, StatTree, StatTreeError, TreeNode, TreeRow};
pub use window::{TimeSeriesWindow, WindowError, WindowSnapshot, DEFAULT_CAPACITY};
