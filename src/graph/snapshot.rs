//! One immutable, fully linked instance of the five entity collections.

use crate::graph::EntityKind;
use crate::graph::entities::{Film, Location, Person, Species, Vehicle};
use indexmap::IndexMap;
use serde::Serialize;

/// Arena of linked entities. Each collection owns its entities by id, in the
/// order the remote source returned them; links are ids into these maps.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub(crate) films: IndexMap<String, Film>,
    pub(crate) species: IndexMap<String, Species>,
    pub(crate) people: IndexMap<String, Person>,
    pub(crate) locations: IndexMap<String, Location>,
    pub(crate) vehicles: IndexMap<String, Vehicle>,
}

/// Per-kind entity counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotCounts {
    pub films: usize,
    pub species: usize,
    pub people: usize,
    pub locations: usize,
    pub vehicles: usize,
}

impl Snapshot {
    /// The snapshot served before anything has been published.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Films => self.films.len(),
            EntityKind::Species => self.species.len(),
            EntityKind::People => self.people.len(),
            EntityKind::Locations => self.locations.len(),
            EntityKind::Vehicles => self.vehicles.len(),
        }
    }

    pub fn counts(&self) -> SnapshotCounts {
        SnapshotCounts {
            films: self.films.len(),
            species: self.species.len(),
            people: self.people.len(),
            locations: self.locations.len(),
            vehicles: self.vehicles.len(),
        }
    }

    pub fn films(&self) -> impl ExactSizeIterator<Item = &Film> {
        self.films.values()
    }

    pub fn species(&self) -> impl ExactSizeIterator<Item = &Species> {
        self.species.values()
    }

    pub fn people(&self) -> impl ExactSizeIterator<Item = &Person> {
        self.people.values()
    }

    pub fn locations(&self) -> impl ExactSizeIterator<Item = &Location> {
        self.locations.values()
    }

    pub fn vehicles(&self) -> impl ExactSizeIterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn film(&self, id: &str) -> Option<&Film> {
        self.films.get(id)
    }

    pub fn species_by_id(&self, id: &str) -> Option<&Species> {
        self.species.get(id)
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.get(id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    /// The people appearing in `film`, in link order.
    pub fn characters_of<'a>(&'a self, film: &'a Film) -> impl Iterator<Item = &'a Person> {
        resolve(&self.people, &film.characters)
    }

    /// The species `person` belongs to, if known.
    pub fn species_of(&self, person: &Person) -> Option<&Species> {
        person.species.as_deref().and_then(|id| self.species.get(id))
    }

    pub fn pilot_of(&self, vehicle: &Vehicle) -> Option<&Person> {
        vehicle.pilot.as_deref().and_then(|id| self.people.get(id))
    }
}

fn resolve<'a, T>(
    collection: &'a IndexMap<String, T>,
    ids: &'a [String],
) -> impl Iterator<Item = &'a T> {
    ids.iter().filter_map(|id| collection.get(id.as_str()))
}
