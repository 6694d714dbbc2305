//! Periodic silent refresh bound to the session's lifetime.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::controller::SyncController;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Handle to the background refresh task.
///
/// The first poll happens one full period after `spawn`; the initial load is
/// the caller's job. In-flight refreshes are never aborted: cancellation is
/// observed between polls. Dropping the handle also stops the task.
pub struct Poller {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    /// Must be called from within a tokio runtime.
    pub fn spawn(controller: SyncController, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            info!(period_ms = period.as_millis() as u64, "todo poller started");
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        debug!("background refresh");
                        controller.refresh(true).await;
                    }
                }
            }
            info!("todo poller stopped");
        });

        Self {
            cancel,
            task: Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Stop polling and wait for the task to wind down.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
