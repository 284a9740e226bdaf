//! Dashboard snapshot processing.
//!
//! This module transforms a raw [`DashboardSnapshot`] into the processed
//! [`DashboardData`] the views render: a freshly built statistics tree, the
//! derived CPU sample and display-ready memory regions.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use serde_json::{json, Value};

use super::cpu::CpuSample;
use super::memmap::MemoryRegion;
use super::stat_tree::{StatTree, StatTreeError};
use super::window::WindowSnapshot;
use crate::source::{DashboardSnapshot, ServiceStatus};

/// Complete processed dashboard data ready for display.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub stats: StatTree,
    pub cpu: Option<CpuSample>,
    /// Regions from the snapshot itself; empty when the appliance serves the
    /// memory map on its own endpoint.
    pub memmap: Vec<MemoryRegion>,
    pub status: Option<ServiceStatus>,
    pub tcp: Option<Value>,
    pub logs: Vec<String>,
    pub last_updated: Instant,
}

impl DashboardData {
    /// Load and process dashboard data from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse dashboard data from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        let snapshot: DashboardSnapshot = serde_json::from_str(content)?;
        Ok(Self::from_snapshot(snapshot)?)
    }

    /// Convert a snapshot into processed data.
    ///
    /// Fails if the statistics list cannot be turned into a tree; the caller
    /// decides whether to keep its previous data.
    pub fn from_snapshot(snapshot: DashboardSnapshot) -> Result<Self, StatTreeError> {
        let stats = StatTree::build(&snapshot.statman)?;

        Ok(Self {
            stats,
            cpu: snapshot.cpu_usage.as_ref().map(CpuSample::from_usage),
            memmap: MemoryRegion::from_entries(&snapshot.memmap),
            status: snapshot.status,
            tcp: snapshot.tcp,
            logs: snapshot.logger,
            last_updated: Instant::now(),
        })
    }

    /// Build the JSON document written by `--export` and the `e` key.
    ///
    /// `memmap` is passed separately because it may come from the dedicated
    /// endpoint rather than this snapshot.
    pub fn to_export(&self, memmap: &[MemoryRegion], cpu_history: Option<&WindowSnapshot>) -> Value {
        let mut export = serde_json::Map::new();

        export.insert(
            "summary".to_string(),
            json!({
                "metrics": self.stats.leaf_count(),
                "regions": memmap.len(),
                "log_lines": self.logs.len(),
                "uptime": self.status.as_ref().and_then(ServiceStatus::uptime_label),
            }),
        );
        export.insert("stats".to_string(), json!(self.stats.nodes()));
        export.insert("cpu".to_string(), json!(self.cpu));
        if let Some(history) = cpu_history {
            let series: serde_json::Map<String, Value> = history
                .series
                .iter()
                .map(|(name, values)| (name.clone(), json!(values)))
                .collect();
            export.insert("cpu_history".to_string(), Value::Object(series));
        }
        export.insert("memmap".to_string(), json!(memmap));
        export.insert("status".to_string(), json!(self.status));
        export.insert("tcp".to_string(), self.tcp.clone().unwrap_or(Value::Null));
        export.insert("logger".to_string(), json!(self.logs));

        Value::Object(export)
    }
}
