//! Builds a linked [`Snapshot`] from the raw collections.
//!
//! Kinds are built in a fixed order so a record only ever references kinds
//! that already exist: films, species, people, locations, vehicles. Each link
//! is recorded on both ends as soon as the second end is built, which keeps
//! the graph symmetric. References that do not resolve are dropped.

use crate::ghibli::models::RawDataset;
use crate::graph::entities::{Film, Location, Person, Species, Vehicle};
use crate::graph::reference::reference_id;
use crate::graph::{EntityKind, Snapshot};
use crate::utils::fmt_duration;
use indexmap::{IndexMap, IndexSet};
use std::time::Instant;
use tracing::{debug, warn};

/// Build a fresh snapshot from `raw`. Never fails: unresolvable references
/// are skipped and duplicate ids keep the first record.
pub fn build_graph(raw: &RawDataset) -> Snapshot {
    let start = Instant::now();

    let mut films: IndexMap<String, Film> = IndexMap::with_capacity(raw.films.len());
    for record in &raw.films {
        insert_unique(&mut films, EntityKind::Films, Film::from(record));
    }

    let mut species: IndexMap<String, Species> = IndexMap::with_capacity(raw.species.len());
    for record in &raw.species {
        if species.contains_key(&record.id) {
            warn_duplicate(EntityKind::Species, &record.id);
            continue;
        }
        let mut entity = Species::from(record);
        for film_id in resolve_all(&record.films, &films) {
            link(&mut films, film_id, |film| &mut film.species, &entity.id);
            entity.films.push(film_id.to_owned());
        }
        species.insert(entity.id.clone(), entity);
    }

    let mut people: IndexMap<String, Person> = IndexMap::with_capacity(raw.people.len());
    for record in &raw.people {
        if people.contains_key(&record.id) {
            warn_duplicate(EntityKind::People, &record.id);
            continue;
        }
        let mut entity = Person::from(record);
        for film_id in resolve_all(&record.films, &films) {
            link(&mut films, film_id, |film| &mut film.characters, &entity.id);
            entity.films.push(film_id.to_owned());
        }
        if let Some(species_id) = resolve_one(record.species.as_deref(), &species) {
            link(&mut species, species_id, |s| &mut s.people, &entity.id);
            entity.species = Some(species_id.to_owned());
        }
        people.insert(entity.id.clone(), entity);
    }

    let mut locations: IndexMap<String, Location> = IndexMap::with_capacity(raw.locations.len());
    for record in &raw.locations {
        if locations.contains_key(&record.id) {
            warn_duplicate(EntityKind::Locations, &record.id);
            continue;
        }
        let mut entity = Location::from(record);
        for film_id in resolve_all(&record.films, &films) {
            link(&mut films, film_id, |film| &mut film.locations, &entity.id);
            entity.films.push(film_id.to_owned());
        }
        for person_id in resolve_all(&record.residents, &people) {
            link(&mut people, person_id, |person| &mut person.locations, &entity.id);
            entity.residents.push(person_id.to_owned());
        }
        locations.insert(entity.id.clone(), entity);
    }

    let mut vehicles: IndexMap<String, Vehicle> = IndexMap::with_capacity(raw.vehicles.len());
    for record in &raw.vehicles {
        if vehicles.contains_key(&record.id) {
            warn_duplicate(EntityKind::Vehicles, &record.id);
            continue;
        }
        let mut entity = Vehicle::from(record);
        for film_id in resolve_all(&record.films, &films) {
            link(&mut films, film_id, |film| &mut film.vehicles, &entity.id);
            entity.films.push(film_id.to_owned());
        }
        if let Some(pilot_id) = resolve_one(record.pilot.as_deref(), &people) {
            link(&mut people, pilot_id, |person| &mut person.vehicles, &entity.id);
            entity.pilot = Some(pilot_id.to_owned());
        }
        vehicles.insert(entity.id.clone(), entity);
    }

    let snapshot = Snapshot {
        films,
        species,
        people,
        locations,
        vehicles,
    };

    debug!(
        films = snapshot.films.len(),
        species = snapshot.species.len(),
        people = snapshot.people.len(),
        locations = snapshot.locations.len(),
        vehicles = snapshot.vehicles.len(),
        elapsed = fmt_duration(start.elapsed()),
        "Entity graph built"
    );

    snapshot
}

/// Resolve a list of references against `index`, deduplicated, in order.
fn resolve_all<'r, T>(references: &'r [String], index: &IndexMap<String, T>) -> IndexSet<&'r str> {
    references
        .iter()
        .filter_map(|reference| reference_id(reference))
        .filter(|id| index.contains_key(*id))
        .collect()
}

fn resolve_one<'r, T>(reference: Option<&'r str>, index: &IndexMap<String, T>) -> Option<&'r str> {
    reference
        .and_then(reference_id)
        .filter(|id| index.contains_key(*id))
}

/// Record the back-link from the already-built entity `target_id` to `from_id`.
fn link<T>(
    index: &mut IndexMap<String, T>,
    target_id: &str,
    field: impl FnOnce(&mut T) -> &mut Vec<String>,
    from_id: &str,
) {
    if let Some(target) = index.get_mut(target_id) {
        field(target).push(from_id.to_owned());
    }
}

fn insert_unique(films: &mut IndexMap<String, Film>, kind: EntityKind, film: Film) {
    if films.contains_key(&film.id) {
        warn_duplicate(kind, &film.id);
        return;
    }
    films.insert(film.id.clone(), film);
}

fn warn_duplicate(kind: EntityKind, id: &str) {
    warn!(kind = %kind, id, "Duplicate id in raw collection, keeping first record");
}
