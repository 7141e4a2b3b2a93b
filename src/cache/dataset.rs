//! TTL-refreshed cache of the linked Ghibli dataset.
//!
//! A refresh fetches all five collections and builds the graph without
//! holding any lock, so readers keep using the previous snapshot while the
//! slow remote calls run. Only the final swap of the published snapshot takes
//! the write lock. Readers clone the current `Arc<Snapshot>` under the read
//! lock and keep it valid for as long as they hold it.
//!
//! Refreshes are single-flight: callers queue on an async gate, and a caller
//! that waited while another refresh published returns without fetching.

use crate::cache::lock::SnapshotLock;
use crate::ghibli::{DatasetSource, FetchError, RawDataset, fetch_dataset};
use crate::graph::{Snapshot, SnapshotCounts, build_graph};
use crate::utils::{fmt_duration, warn_if_slow};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Default maximum snapshot age before a read refreshes synchronously.
pub const DEFAULT_STALENESS_THRESHOLD: Duration = Duration::from_secs(60);

const SLOW_REFRESH_THRESHOLD: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub staleness_threshold: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            staleness_threshold: DEFAULT_STALENESS_THRESHOLD,
        }
    }
}

/// What a successful call to [`DatasetCache::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was fetched, built and published.
    Published(SnapshotCounts),
    /// Another refresh published while this one waited; nothing was fetched.
    Coalesced,
}

/// Everything swapped in by one successful refresh.
struct Published {
    raw: RawDataset,
    graph: Arc<Snapshot>,
    refreshed_at: Instant,
}

pub struct DatasetCache {
    source: Arc<dyn DatasetSource>,
    config: CacheConfig,
    published: SnapshotLock<Option<Published>>,
    /// Serializes refreshes.
    refresh_gate: Mutex<()>,
    /// Bumped after every publish; lets queued refreshes detect they are redundant.
    generation: AtomicU64,
    empty: Arc<Snapshot>,
}

impl DatasetCache {
    pub fn new(source: Arc<dyn DatasetSource>, config: CacheConfig) -> Self {
        Self {
            source,
            config,
            published: SnapshotLock::new(None),
            refresh_gate: Mutex::new(()),
            generation: AtomicU64::new(0),
            empty: Arc::new(Snapshot::empty()),
        }
    }

    /// Refresh synchronously if nothing is published yet or the snapshot is
    /// older than the staleness threshold. A failed refresh is logged and the
    /// previous snapshot stays in place.
    pub async fn ensure_fresh(&self) {
        let age = self.age();
        let stale = match age {
            None => true,
            Some(age) => age > self.config.staleness_threshold,
        };
        if !stale {
            return;
        }

        debug!(
            age = ?age.map(fmt_duration),
            threshold = fmt_duration(self.config.staleness_threshold),
            "Snapshot stale on read, refreshing"
        );
        if let Err(e) = self.refresh().await {
            warn!(
                collection = %e.kind(),
                error = ?e,
                "Refresh on read failed, serving previous snapshot"
            );
        }
    }

    /// Fetch, build and publish a new snapshot.
    ///
    /// On fetch failure nothing is published: the previous snapshot and its
    /// timestamp are left untouched so the next staleness check retries.
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        let observed = self.generation.load(Ordering::Acquire);
        let _gate = self.refresh_gate.lock().await;
        if self.generation.load(Ordering::Acquire) != observed {
            debug!("Snapshot published while waiting for refresh gate, skipping fetch");
            return Ok(RefreshOutcome::Coalesced);
        }

        let start = Instant::now();
        let raw = fetch_dataset(self.source.as_ref()).await?;
        let fetched_in = start.elapsed();

        let graph = Arc::new(build_graph(&raw));
        let counts = graph.counts();
        let next = Published {
            raw,
            graph,
            refreshed_at: Instant::now(),
        };

        // Drop the replaced snapshot after releasing the lock.
        let previous = self.published.with_write(|slot| slot.replace(next));
        self.generation.fetch_add(1, Ordering::AcqRel);
        drop(previous);

        let elapsed = warn_if_slow(start, SLOW_REFRESH_THRESHOLD, "dataset refresh");
        info!(
            films = counts.films,
            species = counts.species,
            people = counts.people,
            locations = counts.locations,
            vehicles = counts.vehicles,
            fetch = fmt_duration(fetched_in),
            elapsed = fmt_duration(elapsed),
            "Dataset cache refreshed"
        );
        Ok(RefreshOutcome::Published(counts))
    }

    /// Freshness-checked read of the current snapshot. Empty if nothing has
    /// ever been published.
    pub async fn read(&self) -> Arc<Snapshot> {
        self.ensure_fresh().await;
        self.current()
    }

    /// The published snapshot without a freshness check.
    pub fn current(&self) -> Arc<Snapshot> {
        self.published
            .with_read(|slot| slot.as_ref().map(|p| Arc::clone(&p.graph)))
            .unwrap_or_else(|| Arc::clone(&self.empty))
    }

    /// Time since the last successful publish.
    pub fn age(&self) -> Option<Duration> {
        self.published
            .with_read(|slot| slot.as_ref().map(|p| p.refreshed_at))
            .map(|at| at.elapsed())
    }

    /// Record counts of the raw collections behind the published snapshot.
    pub fn raw_counts(&self) -> Option<SnapshotCounts> {
        self.published
            .with_read(|slot| slot.as_ref().map(|p| p.raw.counts()))
    }

    /// Number of snapshots published so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for DatasetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCache")
            .field("config", &self.config)
            .field("generation", &self.generation())
            .field("age", &self.age())
            .finish_non_exhaustive()
    }
}
