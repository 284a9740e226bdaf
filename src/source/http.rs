//! HTTP polling data source.
//!
//! Polls the appliance's dashboard API at a fixed period:
//!
//! - `GET {endpoint}/api/dashboard`: full snapshot, every period
//! - `GET {endpoint}/api/dashboard/memmap`: memory map, once at start-up
//!
//! Polls never overlap. The next request is scheduled only after the
//! previous one has completed or timed out. A failed request is logged and the
//! loop carries on at the same period.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{DashboardSnapshot, DataSource, MemmapEntry, SourceError};

/// Period between two polls when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Upper bound on a single request; a slower response is abandoned.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin client for the appliance's dashboard API.
#[derive(Debug, Clone)]
pub struct StatusClient {
    client: Client,
    endpoint: String,
}

impl StatusClient {
    /// Create a client for the appliance at `endpoint` (e.g. `http://10.0.0.42`).
    pub fn new(endpoint: &str) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch one full dashboard snapshot.
    pub async fn fetch_snapshot(&self) -> Result<DashboardSnapshot, SourceError> {
        self.get_json("/api/dashboard").await
    }

    /// Fetch the memory map.
    pub async fn fetch_memmap(&self) -> Result<Vec<MemmapEntry>, SourceError> {
        self.get_json("/api/dashboard/memmap").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}{}", self.endpoint, path);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

/// A data source that polls the appliance's HTTP API in the background.
///
/// Must be created from within a tokio runtime. The poller stops when the
/// source is dropped.
#[derive(Debug)]
pub struct HttpSource {
    receiver: watch::Receiver<Option<DashboardSnapshot>>,
    memmap: Option<oneshot::Receiver<Vec<MemmapEntry>>>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
    task: JoinHandle<()>,
}

impl HttpSource {
    /// Spawn the polling task for the appliance at `endpoint`.
    pub fn spawn(endpoint: &str, interval: Duration) -> Result<Self, SourceError> {
        let client = StatusClient::new(endpoint)?;
        let description = format!("http: {}", client.endpoint());

        let (tx, rx) = watch::channel(None);
        let (memmap_tx, memmap_rx) = oneshot::channel();
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        let task = tokio::spawn(async move {
            info!(endpoint = %client.endpoint(), ?interval, "starting dashboard poller");

            match client.fetch_memmap().await {
                Ok(entries) => {
                    debug!(regions = entries.len(), "fetched memory map");
                    let _ = memmap_tx.send(entries);
                }
                Err(e) => warn!(error = %e, "memory map unavailable"),
            }

            loop {
                match client.fetch_snapshot().await {
                    Ok(snapshot) => {
                        set_error(&error_handle, None);
                        debug!(stats = snapshot.statman.len(), "polled dashboard");
                        if tx.send(Some(snapshot)).is_err() {
                            // Receiver dropped
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "dashboard poll failed");
                        set_error(&error_handle, Some(e.to_string()));
                    }
                }

                tokio::time::sleep(interval).await;
            }

            debug!("dashboard poller stopped");
        });

        Ok(Self {
            receiver: rx,
            memmap: Some(memmap_rx),
            description,
            last_error,
            task,
        })
    }
}

fn set_error(slot: &Mutex<Option<String>>, error: Option<String>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = error;
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<DashboardSnapshot> {
        if self.receiver.has_changed().unwrap_or(false) {
            self.receiver.borrow_and_update().clone()
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|guard| guard.clone())
    }

    fn memmap(&mut self) -> Option<Vec<MemmapEntry>> {
        let receiver = self.memmap.as_mut()?;
        match receiver.try_recv() {
            Ok(entries) => {
                self.memmap = None;
                Some(entries)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.memmap = None;
                None
            }
        }
    }
}

impl Drop for HttpSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}
