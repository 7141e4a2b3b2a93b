use crate::cache::dataset::{DatasetCache, RefreshOutcome};
use crate::utils::fmt_duration;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Default delay between background refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Background loop keeping a [`DatasetCache`] warm.
///
/// Refreshes once on start, then again every `interval` until the token is
/// cancelled. A refresh in flight is never interrupted; cancellation is only
/// observed while waiting for the next tick.
pub struct RefreshScheduler {
    cache: Arc<DatasetCache>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(cache: Arc<DatasetCache>, interval: Duration) -> Self {
        Self { cache, interval }
    }

    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            interval = fmt_duration(self.interval),
            "Refresh scheduler started"
        );

        self.refresh_once().await;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Refresh scheduler received shutdown signal");
                    break;
                }
                _ = time::sleep(self.interval) => {
                    self.refresh_once().await;
                }
            }
        }

        info!("Refresh scheduler exiting gracefully");
    }

    /// Run the loop on its own task.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    async fn refresh_once(&self) {
        match self.cache.refresh().await {
            Ok(RefreshOutcome::Published(_)) => {}
            Ok(RefreshOutcome::Coalesced) => {
                debug!("Scheduled refresh coalesced with a concurrent one");
            }
            // Not fatal: the previous snapshot keeps serving and the next tick retries.
            Err(e) => error!(
                collection = %e.kind(),
                timed_out = e.is_timeout(),
                error = ?e,
                "Scheduled dataset refresh failed"
            ),
        }
    }
}
