//! Cancellable polling tasks for near-real-time widgets
//!
//! Each poller owns one tokio task that fetches a resource on an interval and
//! publishes the result into a [`SnapshotCell`]. Cancelling the poller's token
//! (or dropping its [`PollerHandle`]) stops the task at the next await point,
//! including mid-fetch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::constants::MAX_POLL_BACKOFF_FACTOR;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::ApiError;

/// Last successfully fetched value of a polled resource
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    pub data: T,
    pub fetched_at: DateTime<Utc>,
}

/// Shared slot a poller publishes into and handlers read from
#[derive(Debug)]
pub struct SnapshotCell<T> {
    inner: Arc<RwLock<Option<Snapshot<T>>>>,
}

impl<T> Clone for SnapshotCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }
}

impl<T: Clone> SnapshotCell<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Snapshot<T>> {
        self.inner.read().await.clone()
    }

    pub async fn publish(&self, data: T) {
        let mut slot = self.inner.write().await;
        *slot = Some(Snapshot {
            data,
            fetched_at: Utc::now(),
        });
    }
}

/// Delay before the next poll after `failures` consecutive errors
///
/// interval * 2^failures, capped at interval * MAX_POLL_BACKOFF_FACTOR.
pub fn poll_delay(interval: Duration, failures: u32) -> Duration {
    let factor = 2u32
        .checked_pow(failures)
        .unwrap_or(u32::MAX)
        .min(MAX_POLL_BACKOFF_FACTOR);
    interval.saturating_mul(factor)
}

/// Owner of a running poller; dropping it cancels the task
#[derive(Debug)]
pub struct PollerHandle {
    name: &'static str,
    token: CancellationToken,
    wake: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Skip the rest of the current wait and fetch now
    pub fn refresh_now(&self) {
        self.wake.notify_one();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancel and wait for the task to exit
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(poller = self.name, error = %e, "Poller task ended abnormally");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Start a poller as a child of `parent`
///
/// The first fetch happens immediately. Cancelling `parent` stops this poller
/// too, so one process-wide token tears everything down on shutdown.
pub fn spawn_poller<T, F, Fut>(
    name: &'static str,
    interval: Duration,
    parent: &CancellationToken,
    cell: SnapshotCell<T>,
    fetch: F,
) -> PollerHandle
where
    T: Clone + Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let token = parent.child_token();
    let wake = Arc::new(Notify::new());

    let task = tokio::spawn(run_poller(
        name,
        interval,
        token.clone(),
        wake.clone(),
        cell,
        fetch,
    ));

    PollerHandle {
        name,
        token,
        wake,
        task: Some(task),
    }
}

async fn run_poller<T, F, Fut>(
    name: &'static str,
    interval: Duration,
    token: CancellationToken,
    wake: Arc<Notify>,
    cell: SnapshotCell<T>,
    mut fetch: F,
) where
    T: Clone + Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    debug!(poller = name, interval_ms = interval.as_millis() as u64, "Poller started");
    let mut failures: u32 = 0;

    loop {
        let result = tokio::select! {
            _ = token.cancelled() => break,
            result = fetch() => result,
        };

        match result {
            Ok(data) => {
                if failures > 0 {
                    info!(poller = name, failures, "Poller recovered");
                }
                failures = 0;
                cell.publish(data).await;
                metrics::counter!("polls_total", "poller" => name).increment(1);
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                warn!(
                    poller = name,
                    failures,
                    error = %e,
                    "Poll failed, keeping previous snapshot"
                );
                metrics::counter!("poll_failures_total", "poller" => name).increment(1);
            }
        }

        let delay = poll_delay(interval, failures);
        tokio::select! {
            _ = token.cancelled() => break,
            _ = wake.notified() => debug!(poller = name, "Poller woken early"),
            _ = tokio::time::sleep(delay) => {}
        }
    }

    debug!(poller = name, "Poller stopped");
}
