//! Long-running services and their lifecycle management.

pub mod manager;
pub mod refresher;
pub mod signals;
pub mod web;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A long-running unit of work owned by the [`manager::ServiceManager`].
#[async_trait]
pub trait Service: Send + 'static {
    fn name(&self) -> &'static str;

    /// Run until `shutdown` is cancelled. Returning early, with or without an
    /// error, is treated as the service dying.
    async fn run(self: Box<Self>, shutdown: CancellationToken) -> anyhow::Result<()>;
}
