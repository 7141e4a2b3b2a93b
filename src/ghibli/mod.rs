//! Client for the Studio Ghibli API and the source abstraction the cache
//! fetches through.

pub mod errors;
pub mod json;
pub mod models;

pub use errors::FetchError;
pub use models::{RawDataset, RawFilm, RawLocation, RawPerson, RawSpecies, RawVehicle};

use crate::graph::EntityKind;
use crate::utils::fmt_duration;
use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use url::Url;

/// Where the raw collections come from. One method per entity kind.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn films(&self) -> Result<Vec<RawFilm>, FetchError>;
    async fn species(&self) -> Result<Vec<RawSpecies>, FetchError>;
    async fn people(&self) -> Result<Vec<RawPerson>, FetchError>;
    async fn locations(&self) -> Result<Vec<RawLocation>, FetchError>;
    async fn vehicles(&self) -> Result<Vec<RawVehicle>, FetchError>;
}

/// Fetch all five collections concurrently. The first failure aborts the rest.
pub async fn fetch_dataset(source: &dyn DatasetSource) -> Result<RawDataset, FetchError> {
    let (films, species, people, locations, vehicles) = tokio::try_join!(
        source.films(),
        source.species(),
        source.people(),
        source.locations(),
        source.vehicles(),
    )?;

    Ok(RawDataset {
        films,
        species,
        people,
        locations,
        vehicles,
    })
}

/// HTTP client for `GET {base}/{kind}` on the Ghibli API.
#[derive(Debug, Clone)]
pub struct GhibliApi {
    http: reqwest::Client,
    base_url: Url,
}

impl GhibliApi {
    /// Create a client. `timeout` bounds each request end to end; expiry is
    /// reported as a [`FetchError::Request`].
    pub fn new(base_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        if base_url.cannot_be_a_base() {
            bail!("Ghibli base URL {base_url} cannot be used as a base");
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Collection URL for `kind`, appended to any path already on the base.
    pub fn endpoint(&self, kind: EntityKind) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(kind.as_str());
        }
        url
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<T>, FetchError> {
        let url = self.endpoint(kind);
        let start = Instant::now();
        trace!(kind = %kind, url = %url, "Fetching collection");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request { kind, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                kind,
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request { kind, source })?;
        let records: Vec<T> = json::decode_with_context(&body)
            .with_context(|| format!("decoding {url}"))
            .map_err(|source| FetchError::Decode { kind, source })?;

        debug!(
            kind = %kind,
            records = records.len(),
            bytes = body.len(),
            elapsed = fmt_duration(start.elapsed()),
            "Fetched collection"
        );
        Ok(records)
    }
}

#[async_trait]
impl DatasetSource for GhibliApi {
    async fn films(&self) -> Result<Vec<RawFilm>, FetchError> {
        self.get_collection(EntityKind::Films).await
    }

    async fn species(&self) -> Result<Vec<RawSpecies>, FetchError> {
        self.get_collection(EntityKind::Species).await
    }

    async fn people(&self) -> Result<Vec<RawPerson>, FetchError> {
        self.get_collection(EntityKind::People).await
    }

    async fn locations(&self) -> Result<Vec<RawLocation>, FetchError> {
        self.get_collection(EntityKind::Locations).await
    }

    async fn vehicles(&self) -> Result<Vec<RawVehicle>, FetchError> {
        self.get_collection(EntityKind::Vehicles).await
    }
}
