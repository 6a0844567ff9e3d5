// src/poller.rs
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use crate::models::server::ServerStatus;
use crate::storage::memory::{Applied, StatusStore, ViewState};
use crate::utils::{is_success, FetchError};

#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<ServerStatus, FetchError>;
}

/// Polls a status endpoint over HTTP, either the proxy or the backend itself.
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpStatusSource {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> Result<ServerStatus, FetchError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| FetchError::Transport(e.to_string()))?;
        decode_status(status, &body)
    }
}

/// Non-2xx is a failed poll; a payload whose own `error` is set is not.
pub fn decode_status(status: u16, body: &[u8]) -> Result<ServerStatus, FetchError> {
    if !is_success(status) {
        return Err(FetchError::Status(status));
    }
    serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Running poller. Dropping it stops the timer.
pub struct PollerHandle {
    store: Arc<StatusStore>,
    timer: JoinHandle<()>,
}

impl PollerHandle {
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.store.subscribe()
    }

    pub fn current(&self) -> ViewState {
        self.store.current()
    }

    /// Last successful payload, kept even while an error is shown.
    pub fn last_data(&self) -> Option<ServerStatus> {
        self.store.last_data()
    }

    /// Stops ticking. Fetches already in flight run to completion but their
    /// results are discarded.
    pub fn shutdown(&self) {
        self.timer.abort();
        self.store.dispose();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Fetches once right away and then on every `interval`, forever.
pub fn spawn(source: Arc<dyn StatusSource>, interval: Duration) -> PollerHandle {
    let store = Arc::new(StatusStore::new());
    let timer = tokio::spawn(run(source, store.clone(), interval));
    PollerHandle { store, timer }
}

async fn run(source: Arc<dyn StatusSource>, store: Arc<StatusStore>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if store.is_disposed() {
            break;
        }

        let seq = store.begin_fetch();
        debug!("Status poll #{}", seq);

        // overlapping fetches are allowed
        let source = source.clone();
        let store = store.clone();
        tokio::spawn(async move {
            let result = source.fetch_status().await;
            if let Err(e) = &result {
                warn!("Status poll #{} failed: {}", seq, e);
            }
            match store.apply(seq, result) {
                Applied::Yes => {}
                Applied::Stale => debug!("Discarding stale status poll #{}", seq),
                Applied::Disposed => debug!("Status poll #{} resolved after shutdown", seq),
            }
        });
    }
}
