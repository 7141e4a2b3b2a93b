//! Denormalized entity graph built from the five raw Ghibli collections.

pub mod builder;
pub mod entities;
pub mod reference;
pub mod snapshot;

pub use builder::build_graph;
pub use entities::{Film, Location, Person, Species, Vehicle};
pub use reference::reference_id;
pub use snapshot::{Snapshot, SnapshotCounts};

use serde::Serialize;
use std::fmt;

/// The five collections served by the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Films,
    Species,
    People,
    Locations,
    Vehicles,
}

impl EntityKind {
    /// All kinds, in graph construction order.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Films,
        EntityKind::Species,
        EntityKind::People,
        EntityKind::Locations,
        EntityKind::Vehicles,
    ];

    /// Collection name, which is also the endpoint path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Films => "films",
            EntityKind::Species => "species",
            EntityKind::People => "people",
            EntityKind::Locations => "locations",
            EntityKind::Vehicles => "vehicles",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
