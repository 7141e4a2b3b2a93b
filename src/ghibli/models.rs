//! Raw records as returned by the Ghibli API.
//!
//! Scalar attributes arrive as strings, numbers or `null` depending on the
//! record, so they are normalized to `Option<String>`. Relationship fields
//! hold reference URLs; a few endpoints use a single URL where others use a
//! list, so list fields accept either shape.

use crate::graph::SnapshotCounts;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilm {
    pub id: String,
    #[serde(default, deserialize_with = "scalar")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub producer: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub release_date: Option<String>,
    #[serde(default, rename = "rt_score", deserialize_with = "scalar")]
    pub score: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSpecies {
    pub id: String,
    #[serde(default, deserialize_with = "scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub classification: Option<String>,
    #[serde(default, alias = "eye_color", deserialize_with = "scalar")]
    pub eye_colors: Option<String>,
    #[serde(default, alias = "hair_color", deserialize_with = "scalar")]
    pub hair_colors: Option<String>,
    #[serde(default, deserialize_with = "references")]
    pub films: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPerson {
    pub id: String,
    #[serde(default, deserialize_with = "scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub eye_color: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub hair_color: Option<String>,
    #[serde(default, deserialize_with = "references")]
    pub films: Vec<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub species: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    pub id: String,
    #[serde(default, deserialize_with = "scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub climate: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub terrain: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub surface_water: Option<String>,
    #[serde(default, deserialize_with = "references")]
    pub films: Vec<String>,
    #[serde(default, alias = "people", deserialize_with = "references")]
    pub residents: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVehicle {
    pub id: String,
    #[serde(default, deserialize_with = "scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub vehicle_class: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub length: Option<String>,
    #[serde(default, deserialize_with = "references")]
    pub films: Vec<String>,
    #[serde(default, alias = "people", deserialize_with = "scalar")]
    pub pilot: Option<String>,
}

/// The five raw collections fetched in one refresh.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub films: Vec<RawFilm>,
    pub species: Vec<RawSpecies>,
    pub people: Vec<RawPerson>,
    pub locations: Vec<RawLocation>,
    pub vehicles: Vec<RawVehicle>,
}

impl RawDataset {
    pub fn counts(&self) -> SnapshotCounts {
        SnapshotCounts {
            films: self.films.len(),
            species: self.species.len(),
            people: self.people.len(),
            locations: self.locations.len(),
            vehicles: self.vehicles.len(),
        }
    }
}

fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a scalar, got {}",
            value_kind(&other)
        ))),
    }
}

fn references<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(reference)) => vec![reference],
        Some(OneOrMany::Many(references)) => references,
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
