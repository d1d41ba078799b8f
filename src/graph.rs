//! Knowledge graph port
//!
//! The live implementation is `wikidata::WikidataClient`; tests substitute
//! in-memory stubs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityRef, ResolveType};
use crate::error::Result;

/// An athlete returned by a criterion query
pub type AthleteRef = EntityRef;

/// A player search hit with disambiguation data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteCandidate {
    pub id: String,
    pub label: String,
    pub birth_year: Option<i32>,
    pub place_of_birth: Option<String>,
    pub description: String,
}

/// One team membership statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubSpell {
    pub id: String,
    pub label: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteDetails {
    pub countries: Vec<EntityRef>,
    pub clubs: Vec<ClubSpell>,
}

impl AthleteDetails {
    pub fn has_nationality(&self, country_id: &str) -> bool {
        self.countries.iter().any(|c| c.id == country_id)
    }

    pub fn spell_at(&self, club_id: &str) -> Option<&ClubSpell> {
        self.clubs.iter().find(|c| c.id == club_id)
    }
}

/// Raw autocomplete hit from the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

#[async_trait]
pub trait KnowledgeGraph: Send + Sync {
    /// Live label lookup, ordered by descending popularity
    async fn lookup_entities(&self, label: &str, kind: ResolveType) -> Result<Vec<Entity>>;

    /// Athletes satisfying both criteria (AND)
    async fn athletes_matching(&self, a: &Entity, b: &Entity) -> Result<Vec<AthleteRef>>;

    async fn find_athletes_by_name(&self, name: &str) -> Result<Vec<AthleteCandidate>>;

    async fn athlete_details(&self, athlete_id: &str) -> Result<AthleteDetails>;

    /// Free-text entity search used for autocomplete
    async fn search_entities(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}
