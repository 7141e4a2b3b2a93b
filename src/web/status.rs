//! Health and status handlers.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracing::trace;

use crate::graph::SnapshotCounts;
use crate::state::{AppState, ServiceStatus};

#[derive(Serialize)]
pub struct ServiceInfo {
    status: ServiceStatus,
    updated_secs_ago: u64,
}

#[derive(Serialize)]
pub struct SnapshotInfo {
    generation: u64,
    age_secs: Option<f64>,
    entities: SnapshotCounts,
    raw_records: Option<SnapshotCounts>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    version: &'static str,
    commit: &'static str,
    services: BTreeMap<&'static str, ServiceInfo>,
    snapshot: SnapshotInfo,
}

/// Health check endpoint
pub(super) async fn health() -> Json<Value> {
    trace!("health check requested");
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Service statuses and the state of the published snapshot. Never triggers
/// a refresh.
pub(super) async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let services = state
        .service_statuses
        .all()
        .into_iter()
        .map(|(name, entry)| {
            let info = ServiceInfo {
                status: entry.status,
                updated_secs_ago: entry.since.elapsed().as_secs(),
            };
            (name, info)
        })
        .collect();

    let cache = &state.cache;
    let snapshot = SnapshotInfo {
        generation: cache.generation(),
        age_secs: cache.age().map(|age| age.as_secs_f64()),
        entities: cache.current().counts(),
        raw_records: cache.raw_counts(),
    };

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: env!("GIT_COMMIT_SHORT"),
        services,
        snapshot,
    })
}
