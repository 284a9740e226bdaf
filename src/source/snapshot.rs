//! Wire types for the appliance's dashboard API.
//!
//! These types match the JSON served at `/api/dashboard`. Every field is
//! optional at the top level so that a component missing from the appliance
//! build simply shows up empty, but the shape of each present field is
//! validated by serde at the boundary.

use serde::{Deserialize, Serialize};

pub use crate::data::stat_tree::{MetricSample, MetricValue};

/// One complete poll of the dashboard endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSnapshot {
    /// Flat list of dot-delimited statistics.
    pub statman: Vec<MetricSample>,

    /// CPU counters or percentages since the previous poll.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<CpuUsage>,

    /// Memory map regions. Usually served separately at `/api/dashboard/memmap`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub memmap: Vec<MemmapEntry>,

    /// Stack sampler output, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_sampler: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,

    /// TCP stack state. Its layout varies between appliance builds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<serde_json::Value>,

    /// Most recent log lines, oldest first.
    pub logger: Vec<String>,
}

/// CPU usage as reported by the appliance.
///
/// Older builds report raw cycle counters, newer ones report percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CpuUsage {
    /// Raw counters accumulated over `interval`.
    Counters {
        total: f64,
        halt: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        interval: Option<f64>,
    },
    /// Idle percentage, 0-100.
    Percent {
        idle: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        active: Option<f64>,
    },
}

/// A region of the appliance's physical memory map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemmapEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub addr_start: u64,
    pub addr_end: u64,
    #[serde(default)]
    pub in_use: u64,
}

/// Service status block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// RFC 3339 timestamp, e.g. `2016-12-20T12:29:28Z`.
    pub boot_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Heap usage in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heap_usage: Option<u64>,
    /// CPU frequency in MHz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_freq: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "statman": [
                {"name": "net.eth0.rx", "value": 100},
                {"name": "net.eth0.tx", "value": 50}
            ],
            "cpu_usage": {"total": 1000, "halt": 250, "interval": 1000},
            "status": {
                "version": "v0.9.3",
                "service": "Acorn Web Appliance",
                "heap_usage": 438272,
                "cpu_freq": 2600.38,
                "boot_time": "2016-12-20T12:29:28Z",
                "current_time": "2017-01-10T16:03:53Z"
            },
            "tcp": {"listeners": 1},
            "logger": ["booted", "listening on 80"]
        }"#;

        let snapshot: DashboardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.statman.len(), 2);
        assert_eq!(snapshot.statman[0].name, "net.eth0.rx");
        assert_eq!(
            snapshot.cpu_usage,
            Some(CpuUsage::Counters {
                total: 1000.0,
                halt: 250.0,
                interval: Some(1000.0),
            })
        );

        let status = snapshot.status.unwrap();
        assert_eq!(status.boot_time, "2016-12-20T12:29:28Z");
        assert_eq!(status.heap_usage, Some(438272));
        assert_eq!(status.service.as_deref(), Some("Acorn Web Appliance"));

        assert!(snapshot.memmap.is_empty());
        assert_eq!(snapshot.logger, vec!["booted", "listening on 80"]);
    }

    #[test]
    fn test_deserialize_percent_cpu_usage() {
        let usage: CpuUsage = serde_json::from_str(r#"{"idle": 75.5, "active": 24.5}"#).unwrap();
        assert_eq!(
            usage,
            CpuUsage::Percent {
                idle: 75.5,
                active: Some(24.5),
            }
        );
    }

    #[test]
    fn test_empty_object_is_empty_snapshot() {
        let snapshot: DashboardSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, DashboardSnapshot::default());
    }

    #[test]
    fn test_malformed_field_is_rejected() {
        // cpu_usage matching neither shape
        let result = serde_json::from_str::<DashboardSnapshot>(r#"{"cpu_usage": {"busy": 3}}"#);
        assert!(result.is_err());

        // statman entries must carry a name
        let result = serde_json::from_str::<DashboardSnapshot>(r#"{"statman": [{"value": 3}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_memmap() {
        let json = r#"[{
            "name": "Heap",
            "description": "Dynamic memory",
            "addr_start": 4096,
            "addr_end": 8191,
            "in_use": 1024
        }]"#;
        let entries: Vec<MemmapEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].addr_end, 8191);
        assert_eq!(entries[0].in_use, 1024);
    }
}
