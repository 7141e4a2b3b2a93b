use crate::services::Service;
use crate::services::signals::shutdown_signal;
use crate::state::{ServiceStatus, ServiceStatusRegistry};
use crate::utils::fmt_duration;
use std::process::ExitCode;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

type ServiceExit = (&'static str, anyhow::Result<()>);

/// Owns the registered services, spawns them, and stops them together.
pub struct ServiceManager {
    pending: Vec<Box<dyn Service>>,
    running: JoinSet<ServiceExit>,
    shutdown: CancellationToken,
    statuses: ServiceStatusRegistry,
}

impl ServiceManager {
    pub fn new(statuses: ServiceStatusRegistry) -> Self {
        Self {
            pending: Vec::new(),
            running: JoinSet::new(),
            shutdown: CancellationToken::new(),
            statuses,
        }
    }

    pub fn register_service(&mut self, service: Box<dyn Service>) {
        self.statuses.set(service.name(), ServiceStatus::Starting);
        self.pending.push(service);
    }

    pub fn has_services(&self) -> bool {
        !self.pending.is_empty() || !self.running.is_empty()
    }

    /// Token cancelled when the manager begins shutting down. Cancelling it
    /// from outside triggers the same shutdown as a signal.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn spawn_all(&mut self) {
        for service in self.pending.drain(..) {
            let name = service.name();
            let token = self.shutdown.child_token();
            let statuses = self.statuses.clone();
            self.running.spawn(async move {
                statuses.set(name, ServiceStatus::Active);
                info!(service = name, "Service started");
                (name, service.run(token).await)
            });
        }
    }

    /// Wait for a shutdown signal (or a service dying), then cancel every
    /// service and give them `timeout` to stop.
    pub async fn run(mut self, timeout: Duration) -> ExitCode {
        let statuses = self.statuses.clone();

        let mut exit_code = tokio::select! {
            _ = shutdown_signal() => ExitCode::SUCCESS,
            _ = self.shutdown.cancelled() => ExitCode::SUCCESS,
            Some(joined) = self.running.join_next() => {
                record_exit(&statuses, joined);
                error!("Service exited unexpectedly, shutting down");
                ExitCode::FAILURE
            }
        };

        info!(
            timeout = fmt_duration(timeout),
            remaining = self.running.len(),
            "Shutting down services"
        );
        self.shutdown.cancel();

        let running = &mut self.running;
        let drained = tokio::time::timeout(timeout, async {
            let mut clean = true;
            while let Some(joined) = running.join_next().await {
                clean &= record_exit(&statuses, joined);
            }
            clean
        })
        .await;

        match drained {
            Ok(true) => info!("All services stopped"),
            Ok(false) => exit_code = ExitCode::FAILURE,
            Err(_) => {
                warn!(
                    remaining = self.running.len(),
                    "Services did not stop within the shutdown timeout, aborting"
                );
                self.running.abort_all();
                exit_code = ExitCode::FAILURE;
            }
        }

        exit_code
    }
}

/// Record how a service task ended. Returns whether it stopped cleanly.
fn record_exit(statuses: &ServiceStatusRegistry, joined: Result<ServiceExit, JoinError>) -> bool {
    match joined {
        Ok((name, Ok(()))) => {
            statuses.set(name, ServiceStatus::Stopped);
            info!(service = name, "Service stopped");
            true
        }
        Ok((name, Err(e))) => {
            statuses.set(name, ServiceStatus::Error);
            error!(service = name, error = ?e, "Service failed");
            false
        }
        Err(e) => {
            error!(error = ?e, "Service task panicked");
            false
        }
    }
}
