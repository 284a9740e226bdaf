//! CPU usage derivation for the CPU chart.

use serde::Serialize;

use crate::source::CpuUsage;

/// Series tracked by the CPU chart window.
pub const CPU_SERIES: [&str; 2] = ["total", "active"];

/// How the appliance reported its CPU usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuMode {
    Counters,
    Percent,
}

/// One chart-ready CPU sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpuSample {
    pub total: f64,
    pub active: f64,
    pub mode: CpuMode,
}

impl CpuSample {
    /// Derive the active share from what the appliance reported.
    ///
    /// Counters: `active = total - halt`. Percent: `total = 100` and
    /// `active = 100 - idle`. Both are clamped so `0 <= active <= total`.
    pub fn from_usage(usage: &CpuUsage) -> Self {
        match *usage {
            CpuUsage::Counters { total, halt, .. } => {
                let total = total.max(0.0);
                Self {
                    total,
                    active: (total - halt).clamp(0.0, total),
                    mode: CpuMode::Counters,
                }
            }
            CpuUsage::Percent { idle, .. } => Self {
                total: 100.0,
                active: (100.0 - idle).clamp(0.0, 100.0),
                mode: CpuMode::Percent,
            },
        }
    }

    /// Values keyed by [`CPU_SERIES`] name, ready for the window.
    pub fn series(&self) -> [(&'static str, f64); 2] {
        [(CPU_SERIES[0], self.total), (CPU_SERIES[1], self.active)]
    }

    /// Active share of the total, 0-100.
    pub fn utilization(&self) -> f64 {
        if self.total > 0.0 {
            self.active / self.total * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_subtract_halt() {
        let sample = CpuSample::from_usage(&CpuUsage::Counters {
            total: 2000.0,
            halt: 1500.0,
            interval: Some(1000.0),
        });
        assert_eq!(sample.total, 2000.0);
        assert_eq!(sample.active, 500.0);
        assert_eq!(sample.mode, CpuMode::Counters);
        assert_eq!(sample.utilization(), 25.0);
    }

    #[test]
    fn halt_above_total_clamps_to_zero() {
        let sample = CpuSample::from_usage(&CpuUsage::Counters {
            total: 100.0,
            halt: 150.0,
            interval: None,
        });
        assert_eq!(sample.active, 0.0);
    }

    #[test]
    fn percent_mode_inverts_idle() {
        let sample = CpuSample::from_usage(&CpuUsage::Percent {
            idle: 70.0,
            active: None,
        });
        assert_eq!(sample.total, 100.0);
        assert_eq!(sample.active, 30.0);
        assert_eq!(sample.mode, CpuMode::Percent);
    }

    #[test]
    fn zero_total_has_no_utilization() {
        let sample = CpuSample::from_usage(&CpuUsage::Counters {
            total: 0.0,
            halt: 0.0,
            interval: None,
        });
        assert_eq!(sample.utilization(), 0.0);
    }

    #[test]
    fn series_match_window_names() {
        let sample = CpuSample::from_usage(&CpuUsage::Percent {
            idle: 40.0,
            active: None,
        });
        assert_eq!(sample.series(), [("total", 100.0), ("active", 60.0)]);
    }
}
