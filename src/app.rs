use crate::cache::{DatasetCache, RefreshScheduler};
use crate::cli::ServiceName;
use crate::config::Config;
use crate::ghibli::GhibliApi;
use crate::services::manager::ServiceManager;
use crate::services::refresher::RefresherService;
use crate::services::web::WebService;
use crate::state::AppState;
use crate::utils::fmt_duration;
use anyhow::Context;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

/// The configured cache plus the services that serve and refresh it.
pub struct App {
    config: Config,
    app_state: AppState,
    service_manager: ServiceManager,
}

impl App {
    /// Build the cache and shared state. Nothing is fetched until a service
    /// or a reader asks for data.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let api = GhibliApi::new(config.ghibli_base_url.clone(), config.fetch_timeout)
            .context("Failed to create Ghibli API client")?;

        info!(
            base_url = %api.base_url(),
            fetch_timeout = fmt_duration(config.fetch_timeout),
            staleness_threshold = fmt_duration(config.staleness_threshold),
            refresh_interval = fmt_duration(config.refresh_interval),
            "Dataset cache configured"
        );

        let cache = Arc::new(DatasetCache::new(Arc::new(api), config.cache_config()));
        let app_state = AppState::new(cache);
        let service_manager = ServiceManager::new(app_state.service_statuses.clone());

        Ok(App {
            config,
            app_state,
            service_manager,
        })
    }

    /// Register the services selected on the command line.
    pub fn setup_services(&mut self, services: &[ServiceName]) -> Result<(), anyhow::Error> {
        if services.contains(&ServiceName::Refresher) {
            let scheduler =
                RefreshScheduler::new(self.app_state.cache.clone(), self.config.refresh_interval);
            self.service_manager
                .register_service(Box::new(RefresherService::new(scheduler)));
        }

        if services.contains(&ServiceName::Web) {
            let web_service = WebService::new(
                self.config.bind_address,
                self.config.port,
                self.app_state.clone(),
            );
            self.service_manager.register_service(Box::new(web_service));
        }

        if !self.service_manager.has_services() {
            error!("No services selected, nothing to run");
            anyhow::bail!("no services enabled");
        }

        Ok(())
    }

    pub fn start_services(&mut self) {
        self.service_manager.spawn_all();
    }

    /// Run until a shutdown signal, then stop services within the configured timeout.
    pub async fn run(self) -> ExitCode {
        self.service_manager.run(self.config.shutdown_timeout).await
    }
}
