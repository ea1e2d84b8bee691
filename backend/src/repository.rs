//! Shelter storage interface.
//!
//! Handlers only talk to [`ShelterRepository`]; the backend (JSON seed file or
//! PostgreSQL) is picked at start-up and injected into the router state.

use std::{fs::File, io::Read, path::Path};

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{Shelter, ShelterKind};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("shelter not found: {0}")]
    NotFound(String),
    #[error("failed to read shelter file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid shelter data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid shelter record: {0}")]
    InvalidData(String),
}

#[async_trait]
pub trait ShelterRepository: Send + Sync {
    /// Every shelter, ordered by name.
    async fn all_shelters(&self) -> Result<Vec<Shelter>, RepositoryError>;

    /// Shelters with coordinates matching `filter`, ordered by name.
    async fn find_shelters(
        &self,
        filter: &ShelterFilter,
    ) -> Result<Vec<Shelter>, RepositoryError>;

    async fn get_shelter(&self, id: &str) -> Result<Option<Shelter>, RepositoryError>;

    async fn shelters_with_coordinates(&self) -> Result<Vec<Shelter>, RepositoryError> {
        self.find_shelters(&ShelterFilter::default()).await
    }

    /// Looks up `ids` keeping their order; repeated ids are returned repeatedly.
    async fn resolve_ordered(&self, ids: &[String]) -> Result<Vec<Shelter>, RepositoryError> {
        let mut shelters = Vec::with_capacity(ids.len());
        for id in ids {
            let shelter = self
                .get_shelter(id)
                .await?
                .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
            shelters.push(shelter);
        }
        Ok(shelters)
    }
}

/// Search criteria. Every set criterion must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShelterFilter {
    pub query: Option<String>,
    pub kind: Option<ShelterKind>,
    pub is_free: Option<bool>,
    pub min_capacity: Option<u32>,
    pub is_serviced: Option<bool>,
    pub accessibility: Vec<String>,
    pub amenities: Vec<String>,
}

impl ShelterFilter {
    /// The trimmed free-text query, if any.
    pub fn text(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn matches(&self, shelter: &Shelter) -> bool {
        if shelter.coordinate().is_none() {
            return false;
        }
        if let Some(text) = self.text() {
            let needle = text.to_lowercase();
            let in_name = shelter.name.to_lowercase().contains(&needle);
            let in_description = shelter
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_name && !in_description {
                return false;
            }
        }
        if self.kind.is_some_and(|kind| kind != shelter.kind) {
            return false;
        }
        if self.is_free.is_some_and(|free| free != shelter.is_free) {
            return false;
        }
        if let Some(min) = self.min_capacity {
            if !shelter.capacity.is_some_and(|c| c >= min) {
                return false;
            }
        }
        if self.is_serviced.is_some_and(|s| s != shelter.is_serviced) {
            return false;
        }
        self.accessibility
            .iter()
            .all(|a| shelter.accessibility.contains(a))
            && self.amenities.iter().all(|a| shelter.amenities.contains(a))
    }
}

/// Query string of `GET /api/shelters/search`.
///
/// Values are kept as raw strings and read leniently: list criteria are comma
/// separated, an unparsable `minCapacity` is ignored and a flag is only true
/// when spelled `true`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterSearchParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_free: Option<String>,
    pub min_capacity: Option<String>,
    pub is_serviced: Option<String>,
    pub accessibility: Option<String>,
    pub amenities: Option<String>,
}

impl ShelterSearchParams {
    /// Builds the filter, or `None` when a criterion can match no shelter
    /// (an unknown `type`).
    pub fn into_filter(self) -> Option<ShelterFilter> {
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => None,
            Some("hut") => Some(ShelterKind::Hut),
            Some("shelter") => Some(ShelterKind::Shelter),
            Some(_) => return None,
        };
        Some(ShelterFilter {
            query: self.q,
            kind,
            is_free: self.is_free.as_deref().map(parse_flag),
            min_capacity: self
                .min_capacity
                .and_then(|c| c.trim().parse::<u32>().ok()),
            is_serviced: self.is_serviced.as_deref().map(parse_flag),
            accessibility: split_list(self.accessibility.as_deref()),
            amenities: split_list(self.amenities.as_deref()),
        })
    }
}

fn parse_flag(raw: &str) -> bool {
    raw.trim() == "true"
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Reads a JSON array of shelters.
pub fn load_shelters<R: Read>(reader: R) -> Result<Vec<Shelter>, RepositoryError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Shelters held in memory, typically loaded from the JSON seed file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShelterRepository {
    shelters: Vec<Shelter>,
}

impl InMemoryShelterRepository {
    /// Orders shelters by case-folded name. Unlike a PostgreSQL locale
    /// collation, accented letters still sort after plain ASCII ones.
    pub fn new(mut shelters: Vec<Shelter>) -> Self {
        shelters.sort_by_cached_key(|s| (s.name.to_lowercase(), s.name.clone()));
        Self { shelters }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RepositoryError> {
        load_shelters(reader).map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.shelters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shelters.is_empty()
    }
}

#[async_trait]
impl ShelterRepository for InMemoryShelterRepository {
    async fn all_shelters(&self) -> Result<Vec<Shelter>, RepositoryError> {
        Ok(self.shelters.clone())
    }

    async fn find_shelters(
        &self,
        filter: &ShelterFilter,
    ) -> Result<Vec<Shelter>, RepositoryError> {
        Ok(self
            .shelters
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    async fn get_shelter(&self, id: &str) -> Result<Option<Shelter>, RepositoryError> {
        Ok(self.shelters.iter().find(|s| s.id == id).cloned())
    }
}
