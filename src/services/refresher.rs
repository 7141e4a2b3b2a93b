use crate::cache::RefreshScheduler;
use crate::services::Service;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Runs the [`RefreshScheduler`] under the service manager.
pub struct RefresherService {
    scheduler: RefreshScheduler,
}

impl RefresherService {
    pub fn new(scheduler: RefreshScheduler) -> Self {
        Self { scheduler }
    }
}

#[async_trait]
impl Service for RefresherService {
    fn name(&self) -> &'static str {
        "refresher"
    }

    async fn run(self: Box<Self>, shutdown: CancellationToken) -> anyhow::Result<()> {
        self.scheduler.run(shutdown).await;
        Ok(())
    }
}
