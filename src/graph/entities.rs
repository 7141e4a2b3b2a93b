//! Linked entity types.
//!
//! Relationship fields hold identifiers into the sibling collections of the
//! same [`Snapshot`](super::Snapshot); every identifier stored here resolves
//! within that snapshot.

use crate::ghibli::models::{RawFilm, RawLocation, RawPerson, RawSpecies, RawVehicle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Film {
    pub id: String,
    pub title: Option<String>,
    pub director: Option<String>,
    pub producer: Option<String>,
    pub release_date: Option<String>,
    pub score: Option<String>,
    /// People appearing in the film.
    pub characters: Vec<String>,
    pub species: Vec<String>,
    pub locations: Vec<String>,
    pub vehicles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Species {
    pub id: String,
    pub name: Option<String>,
    pub classification: Option<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
    pub films: Vec<String>,
    pub people: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: String,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
    pub films: Vec<String>,
    pub species: Option<String>,
    pub locations: Vec<String>,
    pub vehicles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: String,
    pub name: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub surface_water: Option<String>,
    pub films: Vec<String>,
    pub residents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub class: Option<String>,
    pub length: Option<String>,
    pub films: Vec<String>,
    pub pilot: Option<String>,
}

// Scalar-only constructors; links are filled in by the builder.

impl From<&RawFilm> for Film {
    fn from(raw: &RawFilm) -> Self {
        Self {
            id: raw.id.clone(),
            title: raw.title.clone(),
            director: raw.director.clone(),
            producer: raw.producer.clone(),
            release_date: raw.release_date.clone(),
            score: raw.score.clone(),
            characters: Vec::new(),
            species: Vec::new(),
            locations: Vec::new(),
            vehicles: Vec::new(),
        }
    }
}

impl From<&RawSpecies> for Species {
    fn from(raw: &RawSpecies) -> Self {
        Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            classification: raw.classification.clone(),
            eye_color: raw.eye_colors.clone(),
            hair_color: raw.hair_colors.clone(),
            films: Vec::new(),
            people: Vec::new(),
        }
    }
}

impl From<&RawPerson> for Person {
    fn from(raw: &RawPerson) -> Self {
        Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            gender: raw.gender.clone(),
            age: raw.age.clone(),
            eye_color: raw.eye_color.clone(),
            hair_color: raw.hair_color.clone(),
            films: Vec::new(),
            species: None,
            locations: Vec::new(),
            vehicles: Vec::new(),
        }
    }
}

impl From<&RawLocation> for Location {
    fn from(raw: &RawLocation) -> Self {
        Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            climate: raw.climate.clone(),
            terrain: raw.terrain.clone(),
            surface_water: raw.surface_water.clone(),
            films: Vec::new(),
            residents: Vec::new(),
        }
    }
}

impl From<&RawVehicle> for Vehicle {
    fn from(raw: &RawVehicle) -> Self {
        Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            description: raw.description.clone(),
            class: raw.vehicle_class.clone(),
            length: raw.length.clone(),
            films: Vec::new(),
            pilot: None,
        }
    }
}
