//! Fixed-capacity rolling window of timestamped samples for live charts.
//!
//! A [`TimeSeriesWindow`] tracks one timestamp sequence plus one numeric
//! sequence per configured series. Every push appends to all of them at once
//! and evicts the oldest sample once the capacity is exceeded, so the
//! sequences always have the same length.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::Instant;

use thiserror::Error;

/// Number of samples kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 20;

/// Errors raised by [`TimeSeriesWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The window must hold at least one sample.
    #[error("window capacity must be positive")]
    ZeroCapacity,

    /// The pushed values do not cover exactly the configured series.
    #[error("series mismatch (missing: {missing:?}, unexpected: {unexpected:?})")]
    Schema {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// The timestamp is older than the newest sample in the window.
    #[error("timestamp is older than the newest sample")]
    OutOfOrder,
}

/// Read-only copy of a window's contents.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    pub timestamps: Vec<Instant>,
    pub series: BTreeMap<String, Vec<f64>>,
}

impl WindowSnapshot {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Chart points for one series: x is seconds since the oldest sample.
    pub fn points(&self, series: &str) -> Vec<(f64, f64)> {
        let (Some(values), Some(origin)) = (self.series.get(series), self.timestamps.first()) else {
            return Vec::new();
        };

        self.timestamps
            .iter()
            .zip(values)
            .map(|(t, v)| (t.duration_since(*origin).as_secs_f64(), *v))
            .collect()
    }

    /// Seconds between the oldest and newest sample.
    pub fn span_secs(&self) -> f64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => last.duration_since(*first).as_secs_f64(),
            _ => 0.0,
        }
    }

    /// Largest value across every series, if there is any sample.
    pub fn max_value(&self) -> Option<f64> {
        self.series.values().flatten().copied().reduce(f64::max)
    }
}

/// Rolling buffer of synchronized samples across a fixed set of series.
#[derive(Debug, Clone)]
pub struct TimeSeriesWindow {
    capacity: usize,
    timestamps: VecDeque<Instant>,
    series: BTreeMap<String, VecDeque<f64>>,
}

impl TimeSeriesWindow {
    /// Create a window tracking the given series.
    ///
    /// Duplicate names are collapsed. Returns [`WindowError::ZeroCapacity`] if
    /// `capacity` is 0.
    pub fn configure<I, S>(series_names: I, capacity: usize) -> Result<Self, WindowError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if capacity == 0 {
            return Err(WindowError::ZeroCapacity);
        }

        let series: BTreeMap<String, VecDeque<f64>> = series_names
            .into_iter()
            .map(|name| (name.into(), VecDeque::with_capacity(capacity + 1)))
            .collect();

        Ok(Self {
            capacity,
            timestamps: VecDeque::with_capacity(capacity + 1),
            series,
        })
    }

    /// Append one sample across all series.
    ///
    /// `values` must name exactly the configured series, each once. A
    /// rejected push leaves the window untouched.
    pub fn push<I, K>(&mut self, timestamp: Instant, values: I) -> Result<(), WindowError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut collected = BTreeMap::new();
        for (name, value) in values {
            let name = name.as_ref().to_string();
            if collected.contains_key(&name) {
                // A series given twice is an extra value, not a replacement
                return Err(WindowError::Schema {
                    missing: vec![],
                    unexpected: vec![name],
                });
            }
            collected.insert(name, value);
        }
        let values = collected;

        self.check_schema(&values)?;
        if self.timestamps.back().is_some_and(|last| timestamp < *last) {
            return Err(WindowError::OutOfOrder);
        }

        self.timestamps.push_back(timestamp);
        for (name, sequence) in self.series.iter_mut() {
            // check_schema guarantees every configured name is present
            if let Some(value) = values.get(name) {
                sequence.push_back(*value);
            }
        }

        if self.timestamps.len() > self.capacity {
            self.timestamps.pop_front();
            for sequence in self.series.values_mut() {
                sequence.pop_front();
            }
        }

        Ok(())
    }

    fn check_schema(&self, values: &BTreeMap<String, f64>) -> Result<(), WindowError> {
        let configured: BTreeSet<&String> = self.series.keys().collect();
        let provided: BTreeSet<&String> = values.keys().collect();
        if configured == provided {
            return Ok(());
        }

        Err(WindowError::Schema {
            missing: configured.difference(&provided).map(|s| s.to_string()).collect(),
            unexpected: provided.difference(&configured).map(|s| s.to_string()).collect(),
        })
    }

    /// Copy out the current contents for rendering.
    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            timestamps: self.timestamps.iter().copied().collect(),
            series: self
                .series
                .iter()
                .map(|(name, values)| (name.clone(), values.iter().copied().collect()))
                .collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Configured series names, in sorted order.
    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Most recent value of a series.
    pub fn latest(&self, series: &str) -> Option<f64> {
        self.series.get(series)?.back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn window(capacity: usize) -> TimeSeriesWindow {
        TimeSeriesWindow::configure(["total", "active"], capacity).unwrap()
    }

    fn at(origin: Instant, secs: u64) -> Instant {
        origin + Duration::from_secs(secs)
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = TimeSeriesWindow::configure(["total"], 0).unwrap_err();
        assert_eq!(err, WindowError::ZeroCapacity);
    }

    #[test]
    fn new_window_is_empty() {
        let w = window(DEFAULT_CAPACITY);
        assert!(w.is_empty());
        assert_eq!(w.capacity(), 20);
        assert_eq!(w.series_names().collect::<Vec<_>>(), vec!["active", "total"]);

        let snap = w.snapshot();
        assert!(snap.is_empty());
        assert_eq!(snap.series["total"].len(), 0);
    }

    #[test]
    fn push_appends_to_every_sequence() {
        let mut w = window(5);
        let t0 = Instant::now();
        w.push(t0, [("total", 10.0), ("active", 4.0)]).unwrap();

        let snap = w.snapshot();
        assert_eq!(snap.timestamps, vec![t0]);
        assert_eq!(snap.series["total"], vec![10.0]);
        assert_eq!(snap.series["active"], vec![4.0]);
        assert_eq!(w.latest("active"), Some(4.0));
    }

    #[test]
    fn oldest_samples_are_evicted() {
        let mut w = window(3);
        let t0 = Instant::now();
        for i in 0..5u64 {
            w.push(at(t0, i), [("total", i as f64), ("active", (i * 2) as f64)]).unwrap();
        }

        let snap = w.snapshot();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.timestamps, vec![at(t0, 2), at(t0, 3), at(t0, 4)]);
        assert_eq!(snap.series["total"], vec![2.0, 3.0, 4.0]);
        assert_eq!(snap.series["active"], vec![4.0, 6.0, 8.0]);
    }

    #[test]
    fn missing_series_is_rejected_without_mutation() {
        let mut w = window(3);
        let t0 = Instant::now();
        w.push(t0, [("total", 1.0), ("active", 1.0)]).unwrap();
        let before = w.snapshot();

        let err = w.push(at(t0, 1), [("total", 2.0)]).unwrap_err();
        assert_eq!(
            err,
            WindowError::Schema {
                missing: vec!["active".to_string()],
                unexpected: vec![],
            }
        );
        assert_eq!(w.snapshot(), before);
    }

    #[test]
    fn repeated_series_is_rejected() {
        let mut w = window(3);
        let err = w
            .push(Instant::now(), [("total", 1.0), ("total", 2.0), ("active", 3.0)])
            .unwrap_err();
        assert_eq!(
            err,
            WindowError::Schema {
                missing: vec![],
                unexpected: vec!["total".to_string()],
            }
        );
        assert!(w.is_empty());
    }

    #[test]
    fn unexpected_series_is_rejected() {
        let mut w = window(3);
        let err = w
            .push(Instant::now(), [("total", 1.0), ("active", 1.0), ("idle", 0.0)])
            .unwrap_err();
        assert_eq!(
            err,
            WindowError::Schema {
                missing: vec![],
                unexpected: vec!["idle".to_string()],
            }
        );
        assert!(w.is_empty());
    }

    #[test]
    fn older_timestamp_is_rejected() {
        let mut w = window(3);
        let t0 = Instant::now();
        w.push(at(t0, 5), [("total", 1.0), ("active", 1.0)]).unwrap();

        let err = w.push(at(t0, 4), [("total", 2.0), ("active", 2.0)]).unwrap_err();
        assert_eq!(err, WindowError::OutOfOrder);
        assert_eq!(w.len(), 1);

        // Equal timestamps are allowed
        w.push(at(t0, 5), [("total", 3.0), ("active", 3.0)]).unwrap();
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn snapshot_is_stable_without_push() {
        let mut w = window(4);
        let t0 = Instant::now();
        w.push(t0, [("total", 1.0), ("active", 0.5)]).unwrap();
        assert_eq!(w.snapshot(), w.snapshot());
    }

    #[test]
    fn points_are_relative_to_oldest_sample() {
        let mut w = window(4);
        let t0 = Instant::now();
        w.push(at(t0, 10), [("total", 100.0), ("active", 20.0)]).unwrap();
        w.push(at(t0, 12), [("total", 100.0), ("active", 60.0)]).unwrap();

        let snap = w.snapshot();
        assert_eq!(snap.points("active"), vec![(0.0, 20.0), (2.0, 60.0)]);
        assert!(snap.points("unknown").is_empty());
        assert_eq!(snap.span_secs(), 2.0);
        assert_eq!(snap.max_value(), Some(100.0));
    }
}
