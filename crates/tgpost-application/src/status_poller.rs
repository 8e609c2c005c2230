//! Periodic DB status refresh.
//!
//! The poller runs on its own task and never touches workbench state; it
//! delivers each fetch outcome over a channel and the owner of the state
//! applies it.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tgpost_core::backend::{Backend, BackendError, DbStatus};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Outcome of one status fetch.
pub type StatusUpdate = std::result::Result<DbStatus, BackendError>;

/// Handle to a running status poller.
///
/// The first fetch happens one full interval after [`StatusPoller::start`].
/// Dropping the handle cancels the loop; [`StatusPoller::stop`] also waits
/// for it to finish.
pub struct StatusPoller {
    handle: Option<JoinHandle<()>>,
    cancel_token: CancellationToken,
}

impl StatusPoller {
    pub fn start(
        backend: Arc<dyn Backend>,
        interval: Duration,
        sender: mpsc::UnboundedSender<StatusUpdate>,
    ) -> Self {
        let interval = interval.max(Duration::from_secs(1));
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(backend, interval, sender, cancel_token.clone()));

        tracing::info!("[StatusPoller] Started (interval: {:?})", interval);
        Self {
            handle: Some(handle),
            cancel_token,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Cancels the loop and waits for the task to exit.
    pub async fn stop(mut self) -> Result<()> {
        self.cancel_token.cancel();
        match self.handle.take() {
            Some(handle) => handle.await.context("status poller task failed to join"),
            None => Ok(()),
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn poll_loop(
    backend: Arc<dyn Backend>,
    interval: Duration,
    sender: mpsc::UnboundedSender<StatusUpdate>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            _ = ticker.tick() => {
                let update = tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    update = backend.fetch_db_status() => update,
                };
                if let Err(err) = &update {
                    tracing::debug!("[StatusPoller] Status fetch failed: {}", err);
                }
                if sender.send(update).is_err() {
                    tracing::debug!("[StatusPoller] Receiver dropped");
                    break;
                }
            }
        }
    }

    tracing::info!("[StatusPoller] Stopped");
}
