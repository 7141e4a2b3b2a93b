//! Shared fixtures: an in-memory dataset source and graph assertions.

#![allow(dead_code)]

use async_trait::async_trait;
use ghibli_cache::ghibli::{
    DatasetSource, FetchError, RawDataset, RawFilm, RawLocation, RawPerson, RawSpecies, RawVehicle,
};
use ghibli_cache::graph::{EntityKind, Snapshot};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

const BASE: &str = "https://ghibliapi.vercel.app";

pub fn url(kind: &str, id: &str) -> String {
    format!("{BASE}/{kind}/{id}")
}

/// In-memory [`DatasetSource`] with knobs for failures and slow fetches.
#[derive(Default)]
pub struct FakeSource {
    dataset: Mutex<RawDataset>,
    failing: AtomicBool,
    holding: AtomicBool,
    fetches: AtomicUsize,
    started: Notify,
    released: Notify,
}

impl FakeSource {
    pub fn new(dataset: RawDataset) -> Arc<Self> {
        Arc::new(Self {
            dataset: Mutex::new(dataset),
            ..Default::default()
        })
    }

    pub fn set_dataset(&self, dataset: RawDataset) {
        *self.dataset.lock().unwrap() = dataset;
    }

    /// Make the people endpoint fail with a 503.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of refresh attempts that reached the source.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Park subsequent film fetches until [`FakeSource::release`]. Parked
    /// fetches signal [`FakeSource::wait_fetch_started`].
    pub fn hold(&self) {
        self.holding.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.holding.store(false, Ordering::SeqCst);
        self.released.notify_one();
    }

    pub async fn wait_fetch_started(&self) {
        self.started.notified().await;
    }

    fn snapshot_of<T>(&self, pick: impl FnOnce(&RawDataset) -> &Vec<T>) -> Vec<T>
    where
        T: Clone,
    {
        pick(&self.dataset.lock().unwrap()).clone()
    }
}

#[async_trait]
impl DatasetSource for FakeSource {
    async fn films(&self) -> Result<Vec<RawFilm>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.holding.load(Ordering::SeqCst) {
            self.started.notify_one();
            self.released.notified().await;
        }
        Ok(self.snapshot_of(|d| &d.films))
    }

    async fn species(&self) -> Result<Vec<RawSpecies>, FetchError> {
        Ok(self.snapshot_of(|d| &d.species))
    }

    async fn people(&self) -> Result<Vec<RawPerson>, FetchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                kind: EntityKind::People,
                status: 503,
                url: url("people", ""),
            });
        }
        Ok(self.snapshot_of(|d| &d.people))
    }

    async fn locations(&self) -> Result<Vec<RawLocation>, FetchError> {
        Ok(self.snapshot_of(|d| &d.locations))
    }

    async fn vehicles(&self) -> Result<Vec<RawVehicle>, FetchError> {
        Ok(self.snapshot_of(|d| &d.vehicles))
    }
}

/// A small but fully cross-referenced dataset. Every name and title ends in
/// `tag`, so a reader can tell which refresh produced what it sees. Includes
/// dangling references, trailing slashes and placeholder collection URLs.
pub fn tagged_dataset(tag: &str) -> RawDataset {
    let name = |base: &str| Some(format!("{base} {tag}"));
    let trailing = |kind: &str, id: &str| format!("{}/", url(kind, id));

    RawDataset {
        films: vec![
            RawFilm {
                id: "f-laputa".into(),
                title: name("Castle in the Sky"),
                director: Some("Hayao Miyazaki".into()),
                release_date: Some("1986".into()),
                score: Some("95".into()),
                ..Default::default()
            },
            RawFilm {
                id: "f-totoro".into(),
                title: name("My Neighbor Totoro"),
                ..Default::default()
            },
            RawFilm {
                id: "f-porco".into(),
                title: name("Porco Rosso"),
                ..Default::default()
            },
        ],
        species: vec![
            RawSpecies {
                id: "s-human".into(),
                name: name("Human"),
                films: vec![
                    url("films", "f-laputa"),
                    trailing("films", "f-totoro"),
                    url("films", "f-porco"),
                ],
                ..Default::default()
            },
            RawSpecies {
                id: "s-totoro".into(),
                name: name("Totoro"),
                films: vec![url("films", "f-totoro"), url("films", "f-404")],
                ..Default::default()
            },
        ],
        people: vec![
            RawPerson {
                id: "p-pazu".into(),
                name: name("Pazu"),
                films: vec![url("films", "f-laputa")],
                species: Some(url("species", "s-human")),
                ..Default::default()
            },
            RawPerson {
                id: "p-satsuki".into(),
                name: name("Satsuki"),
                films: vec![url("films", "f-totoro")],
                species: Some(trailing("species", "s-human")),
                ..Default::default()
            },
            RawPerson {
                id: "p-totoro".into(),
                name: name("Totoro"),
                films: vec![url("films", "f-totoro")],
                species: Some(url("species", "s-totoro")),
                ..Default::default()
            },
            RawPerson {
                id: "p-porco".into(),
                name: name("Porco"),
                films: vec![url("films", "f-porco"), url("films", "f-404")],
                species: Some(url("species", "s-pig")),
                ..Default::default()
            },
        ],
        locations: vec![
            RawLocation {
                id: "l-laputa".into(),
                name: name("Laputa"),
                films: vec![url("films", "f-laputa")],
                residents: vec![url("people", "")],
                ..Default::default()
            },
            RawLocation {
                id: "l-matsugo".into(),
                name: name("Matsugo"),
                films: vec![url("films", "f-totoro")],
                residents: vec![url("people", "p-satsuki"), url("people", "p-totoro")],
                ..Default::default()
            },
        ],
        vehicles: vec![
            RawVehicle {
                id: "v-goliath".into(),
                name: name("Goliath"),
                films: vec![url("films", "f-laputa")],
                pilot: Some(url("people", "p-nobody")),
                ..Default::default()
            },
            RawVehicle {
                id: "v-savoia".into(),
                name: name("Savoia S.21"),
                films: vec![url("films", "f-porco")],
                pilot: Some(url("people", "p-porco")),
                ..Default::default()
            },
        ],
    }
}

/// Assert every link resolves within `snapshot` and is recorded on both ends.
pub fn assert_symmetric(snapshot: &Snapshot) {
    for film in snapshot.films() {
        for id in &film.characters {
            let person = snapshot.person(id).expect("dangling character link");
            assert!(person.films.contains(&film.id), "{} -/-> {}", id, film.id);
        }
        for id in &film.species {
            let species = snapshot.species_by_id(id).expect("dangling species link");
            assert!(species.films.contains(&film.id), "{} -/-> {}", id, film.id);
        }
        for id in &film.locations {
            let location = snapshot.location(id).expect("dangling location link");
            assert!(location.films.contains(&film.id), "{} -/-> {}", id, film.id);
        }
        for id in &film.vehicles {
            let vehicle = snapshot.vehicle(id).expect("dangling vehicle link");
            assert!(vehicle.films.contains(&film.id), "{} -/-> {}", id, film.id);
        }
    }

    for species in snapshot.species() {
        assert_films_link_back(snapshot, &species.films, |f| &f.species, &species.id);
        for id in &species.people {
            let person = snapshot.person(id).expect("dangling species member");
            assert_eq!(person.species.as_deref(), Some(species.id.as_str()));
        }
    }

    for person in snapshot.people() {
        assert_films_link_back(snapshot, &person.films, |f| &f.characters, &person.id);
        if let Some(id) = &person.species {
            let species = snapshot.species_by_id(id).expect("dangling person species");
            assert!(species.people.contains(&person.id));
        }
        for id in &person.locations {
            let location = snapshot.location(id).expect("dangling person location");
            assert!(location.residents.contains(&person.id));
        }
        for id in &person.vehicles {
            let vehicle = snapshot.vehicle(id).expect("dangling person vehicle");
            assert_eq!(vehicle.pilot.as_deref(), Some(person.id.as_str()));
        }
    }

    for location in snapshot.locations() {
        assert_films_link_back(snapshot, &location.films, |f| &f.locations, &location.id);
        for id in &location.residents {
            let person = snapshot.person(id).expect("dangling resident");
            assert!(person.locations.contains(&location.id));
        }
    }

    for vehicle in snapshot.vehicles() {
        assert_films_link_back(snapshot, &vehicle.films, |f| &f.vehicles, &vehicle.id);
        if let Some(id) = &vehicle.pilot {
            let pilot = snapshot.person(id).expect("dangling pilot");
            assert!(pilot.vehicles.contains(&vehicle.id));
        }
    }
}

fn assert_films_link_back(
    snapshot: &Snapshot,
    film_ids: &[String],
    back_links: impl Fn(&ghibli_cache::graph::Film) -> &Vec<String>,
    id: &str,
) {
    for film_id in film_ids {
        let film = snapshot.film(film_id).expect("dangling film link");
        assert!(
            back_links(film).iter().any(|linked| linked == id),
            "{film_id} -/-> {id}"
        );
    }
}

/// Assert every named entity in `snapshot` came from the dataset tagged `tag`.
pub fn assert_single_tag(snapshot: &Snapshot, tag: &str) {
    let suffix = format!(" {tag}");
    let names = snapshot
        .films()
        .map(|f| &f.title)
        .chain(snapshot.species().map(|s| &s.name))
        .chain(snapshot.people().map(|p| &p.name))
        .chain(snapshot.locations().map(|l| &l.name))
        .chain(snapshot.vehicles().map(|v| &v.name));
    for name in names {
        let name = name.as_deref().unwrap_or_default();
        assert!(name.ends_with(&suffix), "{name:?} is not from dataset {tag}");
    }
}
