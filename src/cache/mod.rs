//! Snapshot cache: the writer-preference lock, the TTL-refreshed dataset
//! cache and its background refresher.

pub mod dataset;
pub mod lock;
pub mod scheduler;

pub use dataset::{CacheConfig, DatasetCache, RefreshOutcome};
pub use lock::SnapshotLock;
pub use scheduler::RefreshScheduler;
