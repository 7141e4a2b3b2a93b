use crate::services::Service;
use crate::state::AppState;
use crate::web::create_router;
use anyhow::Context;
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// HTTP front-end.
pub struct WebService {
    addr: SocketAddr,
    app_state: AppState,
}

impl WebService {
    pub fn new(bind_address: IpAddr, port: u16, app_state: AppState) -> Self {
        Self {
            addr: SocketAddr::new(bind_address, port),
            app_state,
        }
    }
}

#[async_trait]
impl Service for WebService {
    fn name(&self) -> &'static str {
        "web"
    }

    async fn run(self: Box<Self>, shutdown: CancellationToken) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;
        info!(address = %self.addr, "Web server listening");

        let router = create_router(self.app_state);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .context("Web server failed")?;

        info!("Web server stopped");
        Ok(())
    }
}
