use crate::cli::TracingFormat;
use crate::config::Config;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise this crate logs at `LOG_LEVEL` and
/// dependencies only at `warn`, which keeps reqwest and hyper quiet.
pub fn setup_logging(config: &Config, tracing_format: TracingFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let output = match tracing_format {
        TracingFormat::Pretty => fmt::layer().with_target(true).compact().boxed(),
        TracingFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true)
            .boxed(),
    };

    tracing_subscriber::registry().with(filter).with(output).init();
}

fn default_directives(level: &str) -> String {
    format!("warn,ghibli_cache={level}")
}
