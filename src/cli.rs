use clap::{Parser, ValueEnum};

/// Serves a cached, cross-linked view of the Studio Ghibli API.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Log output format
    #[arg(long, value_enum, default_value_t = TracingFormat::default())]
    pub tracing: TracingFormat,

    /// Services to run (defaults to all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub services: Vec<ServiceName>,
}

impl Args {
    pub fn enabled_services(&self) -> Vec<ServiceName> {
        if self.services.is_empty() {
            ServiceName::all().to_vec()
        } else {
            self.services.clone()
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable, single-line output
    Pretty,
    /// Structured JSON, one object per line
    Json,
}

impl Default for TracingFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            TracingFormat::Pretty
        } else {
            TracingFormat::Json
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServiceName {
    /// HTTP front-end serving `/movies/`
    Web,
    /// Background snapshot refresher
    Refresher,
}

impl ServiceName {
    pub fn all() -> &'static [ServiceName] {
        &[ServiceName::Web, ServiceName::Refresher]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceName::Web => "web",
            ServiceName::Refresher => "refresher",
        }
    }
}
