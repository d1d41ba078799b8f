//! Canonical entities (countries, clubs, achievements) and label resolution
//!
//! This module provides:
//! - `Entity` and its type tags
//! - Achievement sentinels answered by the local athlete index
//! - The curated club override table
//! - `EntityResolver`, which turns free-text labels into ranked entities

pub mod achievement;
pub mod overrides;
pub mod resolver;

pub use achievement::Achievement;
pub use resolver::EntityResolver;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Popularity assigned to entities that bypass the live graph
pub const MAX_POPULARITY: u32 = 9999;

/// What kind of criterion an entity can act as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Country,
    Club,
    Achievement,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Country => "country",
            EntityType::Club => "club",
            EntityType::Achievement => "achievement",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type hint accepted by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveType {
    #[default]
    Auto,
    Country,
    Club,
    Achievement,
}

impl ResolveType {
    /// The type to try when this one yields nothing (country <-> club)
    pub fn opposite(&self) -> Option<ResolveType> {
        match self {
            ResolveType::Country => Some(ResolveType::Club),
            ResolveType::Club => Some(ResolveType::Country),
            ResolveType::Auto | ResolveType::Achievement => None,
        }
    }
}

impl From<EntityType> for ResolveType {
    fn from(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Country => ResolveType::Country,
            EntityType::Club => ResolveType::Club,
            EntityType::Achievement => ResolveType::Achievement,
        }
    }
}

impl FromStr for ResolveType {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(ResolveType::Auto),
            "country" => Ok(ResolveType::Country),
            "club" => Ok(ResolveType::Club),
            "achievement" => Ok(ResolveType::Achievement),
            other => Err(BoardError::InvalidParameter(format!(
                "unknown entity type '{}', expected auto, country, club or achievement",
                other
            ))),
        }
    }
}

/// A resolved real-world thing usable as a grid criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub popularity: u32,
    pub source_country: Option<String>,
}

impl Entity {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        entity_type: EntityType,
        popularity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            entity_type,
            popularity,
            source_country: None,
        }
    }

    pub fn with_source_country(mut self, country: impl Into<String>) -> Self {
        let country = country.into();
        self.source_country = if country.is_empty() {
            None
        } else {
            Some(country)
        };
        self
    }

    pub fn achievement(&self) -> Option<Achievement> {
        Achievement::from_id(&self.id)
    }
}

/// `{id, label}` pair as returned by the graph for athletes, countries, clubs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub label: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}
