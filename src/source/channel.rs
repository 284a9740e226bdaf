//! Channel-based data source.
//!
//! Receives dashboard snapshots via a tokio watch channel. This is useful when
//! the dashboard is embedded in a process that already has the snapshots in
//! hand, and in tests.

use tokio::sync::watch;

use super::{DashboardSnapshot, DataSource};

/// A data source that receives dashboard snapshots via a channel.
///
/// The producer sends snapshots through the channel and this source hands
/// the newest one to the TUI. Intermediate snapshots sent between two polls
/// are skipped.
///
/// # Example
///
/// ```
/// use acorn_dash::ChannelSource;
///
/// // Create a channel pair
/// let (tx, source) = ChannelSource::create("embedded");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<DashboardSnapshot>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - A description of where snapshots come from
    ///
    /// The value already in the channel is handed out by the first poll.
    pub fn new(mut receiver: watch::Receiver<DashboardSnapshot>, source_description: &str) -> Self {
        receiver.mark_changed();
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    ///
    /// Returns (sender, source) where the sender can be used to push
    /// snapshots and the source can be handed to the [`App`](crate::App).
    pub fn create(source_description: &str) -> (watch::Sender<DashboardSnapshot>, Self) {
        let (tx, rx) = watch::channel(DashboardSnapshot::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<DashboardSnapshot> {
        // A closed channel still has its last value; error() reports the closure
        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            Ok(false) | Err(_) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        if self.receiver.has_changed().is_err() {
            Some("Channel closed".to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MetricSample;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) snapshot
        let snapshot = source.poll();
        assert!(snapshot.is_some());
        assert!(snapshot.unwrap().statman.is_empty());

        // No change, so poll returns None
        assert!(source.poll().is_none());

        // Send a new snapshot
        let new_snapshot = DashboardSnapshot {
            statman: vec![MetricSample::new("net.eth0.rx", 5i64)],
            ..Default::default()
        };
        tx.send(new_snapshot).unwrap();

        // Now poll returns the new snapshot
        let snapshot = source.poll();
        assert!(snapshot.is_some());
        assert_eq!(snapshot.unwrap().statman.len(), 1);
    }

    #[test]
    fn test_channel_source_reports_closed_sender() {
        let (tx, source) = ChannelSource::create("test");
        assert!(source.error().is_none());
        assert_eq!(source.description(), "channel: test");

        drop(tx);
        assert_eq!(source.error().as_deref(), Some("Channel closed"));
    }
}
