//! Wikidata API Client
//!
//! HTTP client for the public SPARQL endpoint and the `wbsearchentities`
//! search API. Every request carries a timeout; failures surface as
//! `BoardError::UpstreamQuery`.

use std::collections::HashSet;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};

use super::queries;
use super::types::{self, Binding, SearchResponse, SparqlResponse};
use crate::config::AppConfig;
use crate::entity::{Entity, EntityRef, EntityType, ResolveType};
use crate::error::{BoardError, Result};
use crate::graph::{
    AthleteCandidate, AthleteDetails, AthleteRef, ClubSpell, KnowledgeGraph, SearchHit,
};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
/// The search API rejects larger page sizes
const MAX_SEARCH_LIMIT: usize = 50;

pub struct WikidataClient {
    client: Client,
    search_client: Client,
    sparql_endpoint: String,
    search_endpoint: String,
    user_agent: String,
}

impl WikidataClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.query_timeout)
            .build()
            .context("Failed to create SPARQL HTTP client")?;
        let search_client = Client::builder()
            .timeout(config.search_timeout)
            .build()
            .context("Failed to create search HTTP client")?;

        Ok(Self {
            client,
            search_client,
            sparql_endpoint: config.sparql_endpoint.clone(),
            search_endpoint: config.search_endpoint.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Run a SELECT query and return its bindings
    pub async fn select(&self, query: &str) -> Result<Vec<Binding>> {
        let response = self
            .client
            .get(&self.sparql_endpoint)
            .query(&[("query", query), ("format", "json")])
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!("SPARQL request failed: {}", e);
                BoardError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("SPARQL endpoint returned {}", status);
            return Err(BoardError::upstream(format!(
                "SPARQL endpoint error {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let text = response.text().await?;
        let parsed: SparqlResponse = serde_json::from_str(&text).map_err(|e| {
            BoardError::upstream(format!(
                "Failed to parse SPARQL response: {}. First 200 chars: {}",
                e,
                text.chars().take(200).collect::<String>()
            ))
        })?;

        Ok(parsed.results.bindings)
    }
}

fn entity_from_binding(binding: &Binding, kind: ResolveType) -> Option<Entity> {
    let id = types::entity_id(binding, "entity")?;
    let label = types::value(binding, "entityLabel").unwrap_or(&id).to_string();
    let popularity = types::value(binding, "sitelinks")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);

    let entity_type = match kind {
        ResolveType::Country => EntityType::Country,
        ResolveType::Club => EntityType::Club,
        ResolveType::Auto | ResolveType::Achievement => {
            if types::value(binding, "isCountry") == Some("true") {
                EntityType::Country
            } else if types::value(binding, "isClub") == Some("true") {
                EntityType::Club
            } else {
                // People, cities and the like are never board criteria
                return None;
            }
        }
    };

    let country = types::value(binding, "countryLabel").unwrap_or_default();
    Some(Entity::new(id, label, entity_type, popularity).with_source_country(country))
}

#[async_trait]
impl KnowledgeGraph for WikidataClient {
    async fn lookup_entities(&self, label: &str, kind: ResolveType) -> Result<Vec<Entity>> {
        if kind == ResolveType::Achievement {
            return Ok(vec![]);
        }

        let bindings = self.select(&queries::entity_lookup(label, kind)).await?;

        // The OPTIONAL country join can repeat an entity once per country
        let mut seen = HashSet::new();
        let entities = bindings
            .iter()
            .filter_map(|b| entity_from_binding(b, kind))
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        Ok(entities)
    }

    async fn athletes_matching(&self, a: &Entity, b: &Entity) -> Result<Vec<AthleteRef>> {
        let Some(query) = queries::athletes_matching(a, b) else {
            debug!(
                "No graph query for {} ({}) x {} ({})",
                a.id, a.entity_type, b.id, b.entity_type
            );
            return Ok(vec![]);
        };

        let bindings = self.select(&query).await?;
        let athletes = bindings
            .iter()
            .filter_map(|b| {
                let id = types::entity_id(b, "player")?;
                let label = types::value(b, "playerLabel").unwrap_or(&id).to_string();
                Some(EntityRef::new(id, label))
            })
            .collect();
        Ok(athletes)
    }

    async fn find_athletes_by_name(&self, name: &str) -> Result<Vec<AthleteCandidate>> {
        let bindings = self.select(&queries::athletes_by_name(name)).await?;

        let mut seen = HashSet::new();
        let candidates = bindings
            .iter()
            .filter_map(|b| {
                let id = types::entity_id(b, "player")?;
                Some(AthleteCandidate {
                    label: types::value(b, "playerLabel").unwrap_or(&id).to_string(),
                    birth_year: types::year(b, "dob"),
                    place_of_birth: types::value(b, "pobLabel").map(str::to_string),
                    description: types::value(b, "description")
                        .unwrap_or_default()
                        .to_string(),
                    id,
                })
            })
            .filter(|c| seen.insert(c.id.clone()))
            .collect();
        Ok(candidates)
    }

    async fn athlete_details(&self, athlete_id: &str) -> Result<AthleteDetails> {
        if !queries::is_entity_id(athlete_id) {
            return Err(BoardError::InvalidParameter(format!(
                "'{}' is not a Wikidata item id",
                athlete_id
            )));
        }

        let bindings = self.select(&queries::athlete_details(athlete_id)).await?;

        let mut details = AthleteDetails::default();
        let mut seen_countries = HashSet::new();
        let mut seen_spells = HashSet::new();
        for binding in &bindings {
            if let Some(id) = types::entity_id(binding, "country") {
                if seen_countries.insert(id.clone()) {
                    let label = types::value(binding, "countryLabel").unwrap_or(&id).to_string();
                    details.countries.push(EntityRef::new(id, label));
                }
            }
            if let Some(id) = types::entity_id(binding, "club") {
                let spell = ClubSpell {
                    label: types::value(binding, "clubLabel").unwrap_or(&id).to_string(),
                    start_year: types::year(binding, "startTime"),
                    end_year: types::year(binding, "endTime"),
                    id,
                };
                // Country rows multiply club rows; keep each spell once
                if seen_spells.insert((spell.id.clone(), spell.start_year, spell.end_year)) {
                    details.clubs.push(spell);
                }
            }
        }
        Ok(details)
    }

    async fn search_entities(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT).to_string();
        let response = self
            .search_client
            .get(&self.search_endpoint)
            .query(&[
                ("action", "wbsearchentities"),
                ("search", query),
                ("language", "en"),
                ("limit", limit.as_str()),
                ("format", "json"),
            ])
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoardError::upstream(format!(
                "Search endpoint error {}",
                status
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed
            .search
            .into_iter()
            .map(|entry| SearchHit {
                label: entry.label.unwrap_or_else(|| entry.id.clone()),
                description: entry.description.unwrap_or_default(),
                id: entry.id,
            })
            .collect())
    }
}
