//! State shared by the HTTP handlers and the background services.

use crate::cache::DatasetCache;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Lifecycle of a service run by the service manager.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Starting,
    Active,
    Stopped,
    Error,
}

#[derive(Debug, Clone, Copy)]
pub struct StatusEntry {
    pub status: ServiceStatus,
    pub since: Instant,
}

/// Last reported status per service, keyed by service name.
#[derive(Debug, Clone, Default)]
pub struct ServiceStatusRegistry {
    entries: Arc<DashMap<&'static str, StatusEntry>>,
}

impl ServiceStatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, service: &'static str, status: ServiceStatus) {
        let since = Instant::now();
        self.entries.insert(service, StatusEntry { status, since });
    }

    pub fn get(&self, service: &str) -> Option<ServiceStatus> {
        self.entries.get(service).map(|entry| entry.status)
    }

    /// Every entry, ordered by service name.
    pub fn all(&self) -> Vec<(&'static str, StatusEntry)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        entries.sort_unstable_by_key(|(service, _)| *service);
        entries
    }
}

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DatasetCache>,
    pub service_statuses: ServiceStatusRegistry,
}

impl AppState {
    pub fn new(cache: Arc<DatasetCache>) -> Self {
        Self {
            cache,
            service_statuses: ServiceStatusRegistry::new(),
        }
    }
}
