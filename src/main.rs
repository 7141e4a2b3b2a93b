use clap::Parser;
use ghibli_cache::app::App;
use ghibli_cache::cli::Args;
use ghibli_cache::config::Config;
use ghibli_cache::logging::setup_logging;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let enabled_services = args.enabled_services();

    // Load config and setup logging before App::new() so startup logs are never silently dropped
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:?}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        services = ?enabled_services,
        "starting ghibli-cache"
    );

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!(error = ?e, "Failed to initialize application");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = app.setup_services(&enabled_services) {
        error!(error = ?e, "Failed to setup services");
        return ExitCode::FAILURE;
    }

    app.start_services();
    app.run().await
}
