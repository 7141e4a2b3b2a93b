//! Application configuration, read from the environment.
//!
//! Durations accept plain seconds (`60`, `0.5`) or unit strings (`1m`,
//! `500ms`, `2h`).

use crate::cache::CacheConfig;
use crate::cache::dataset::DEFAULT_STALENESS_THRESHOLD;
use crate::cache::scheduler::DEFAULT_REFRESH_INTERVAL;
use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::Env;
use fundu::{DurationParser, TimeUnit};
use serde::{Deserialize, Deserializer, de};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Level for this crate's logs; other crates log at `warn`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    #[serde(default = "default_ghibli_base_url")]
    pub ghibli_base_url: Url,
    /// Maximum snapshot age before a read refreshes synchronously.
    #[serde(
        default = "default_staleness_threshold",
        deserialize_with = "deserialize_duration"
    )]
    pub staleness_threshold: Duration,
    /// Delay between background refreshes.
    #[serde(
        default = "default_refresh_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub refresh_interval: Duration,
    /// Per-request bound on calls to the Ghibli API.
    #[serde(
        default = "default_fetch_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub fetch_timeout: Duration,
    /// Grace period for services to stop after a shutdown signal.
    #[serde(
        default = "default_shutdown_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub shutdown_timeout: Duration,
}

impl Config {
    /// Load from environment variables (`PORT`, `GHIBLI_BASE_URL`, ...).
    pub fn load() -> anyhow::Result<Self> {
        Self::from_figment(Figment::new().merge(Env::raw()))
    }

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config: Config = figment.extract().context("Failed to load config")?;
        if config.refresh_interval.is_zero() {
            bail!("REFRESH_INTERVAL must be greater than zero");
        }
        Ok(config)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            staleness_threshold: self.staleness_threshold,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_ghibli_base_url() -> Url {
    Url::parse("https://ghibliapi.vercel.app").expect("default base URL is valid")
}

fn default_staleness_threshold() -> Duration {
    DEFAULT_STALENESS_THRESHOLD
}

fn default_refresh_interval() -> Duration {
    DEFAULT_REFRESH_INTERVAL
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(8)
}

/// Parse a duration string; a bare number is taken as seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let parser = DurationParser::with_time_units(&[
        TimeUnit::MilliSecond,
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
    ]);
    let parsed = parser
        .parse(input.trim())
        .map_err(|e| format!("invalid duration {input:?}: {e}"))?;
    Duration::try_from(parsed).map_err(|e| format!("invalid duration {input:?}: {e}"))
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DurationValue {
        Seconds(u64),
        Fractional(f64),
        Text(String),
    }

    match DurationValue::deserialize(deserializer)? {
        DurationValue::Seconds(secs) => Ok(Duration::from_secs(secs)),
        DurationValue::Fractional(secs) => Duration::try_from_secs_f64(secs)
            .map_err(|e| de::Error::custom(format!("invalid duration {secs}: {e}"))),
        DurationValue::Text(text) => parse_duration(&text).map_err(de::Error::custom),
    }
}
