//! Core type definitions for the Portal catalog.
//!
//! Defines the catalog entry model, the categorical status and gender
//! fields, the raw remote record shape, and aggregate statistics.

use serde::{Deserialize, Serialize};

/// First identifier handed out to user-created entries.
///
/// Remote identifiers are assumed to stay below this value.
pub const USER_ID_START: u64 = 10_000;

/// Life status of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Alive,
    Dead,
    #[default]
    Unknown,
}

impl Status {
    /// Lenient, case-insensitive parse. Anything unrecognised is `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "alive" => Status::Alive,
            "dead" => Status::Dead,
            _ => Status::Unknown,
        }
    }

    /// Map a numbered menu choice (1-3) to a status.
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim() {
            "1" => Status::Alive,
            "2" => Status::Dead,
            _ => Status::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Alive => "Alive",
            Status::Dead => "Dead",
            Status::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Status::parse(&value)
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.as_str().to_string()
    }
}

/// Gender of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Genderless,
    #[default]
    Unknown,
}

impl Gender {
    /// Lenient, case-insensitive parse. Anything unrecognised is `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            "genderless" => Gender::Genderless,
            _ => Gender::Unknown,
        }
    }

    /// Map a numbered menu choice (1-4) to a gender.
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim() {
            "1" => Gender::Male,
            "2" => Gender::Female,
            "3" => Gender::Genderless,
            _ => Gender::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Genderless => "Genderless",
            Gender::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        Gender::parse(&value)
    }
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        value.as_str().to_string()
    }
}

/// A single character in the combined catalog.
///
/// This is also the flat record shape of the durable store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
    pub status: Status,
    pub species: String,
    pub gender: Gender,
    pub origin: String,
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub episode_count: usize,
    #[serde(default)]
    pub created_by_user: bool,
}

impl CatalogEntry {
    /// Build a draft entry for local creation. The id is assigned by storage.
    pub fn draft(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            status: Status::Alive,
            species: "Human".to_string(),
            gender: Gender::Male,
            origin: "Unknown".to_string(),
            location: "Unknown".to_string(),
            image_url: String::new(),
            episode_count: 0,
            created_by_user: true,
        }
    }

    /// Map a raw remote record, filling in defaults for missing fields.
    pub fn from_remote(record: RemoteRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            status: record.status.as_deref().map(Status::parse).unwrap_or_default(),
            species: record.species.unwrap_or_else(|| "Unknown".to_string()),
            gender: record.gender.as_deref().map(Gender::parse).unwrap_or_default(),
            origin: NamedRef::name_or_unknown(record.origin),
            location: NamedRef::name_or_unknown(record.location),
            image_url: record.image.unwrap_or_default(),
            episode_count: record.episode.map(|e| e.len()).unwrap_or(0),
            created_by_user: false,
        }
    }

    /// Whether the name contains `query`, ignoring case.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// A nested `{ "name": ... }` object in a remote record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedRef {
    fn name_or_unknown(value: Option<NamedRef>) -> String {
        value
            .and_then(|r| r.name)
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// One character as returned by the remote API, before defaulting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub origin: Option<NamedRef>,
    #[serde(default)]
    pub location: Option<NamedRef>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub episode: Option<Vec<serde_json::Value>>,
}

impl RemoteRecord {
    /// Minimal record with only the required fields set.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Aggregate counts over the combined catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub alive: usize,
    pub dead: usize,
    pub unknown: usize,
    pub user_created: usize,
}

impl CatalogStats {
    pub fn collect<'a>(entries: impl IntoIterator<Item = &'a CatalogEntry>) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            stats.total += 1;
            match entry.status {
                Status::Alive => stats.alive += 1,
                Status::Dead => stats.dead += 1,
                Status::Unknown => stats.unknown += 1,
            }
            if entry.created_by_user {
                stats.user_created += 1;
            }
        }
        stats
    }
}
