//! Player lookup: name search, autocomplete and per-athlete facts.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::graph::{AthleteCandidate, AthleteDetails, KnowledgeGraph, SearchHit};
use crate::similarity::similarity;

pub const MIN_AUTOCOMPLETE_QUERY: usize = 2;
pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 10;
/// Largest number of suggestions a caller may ask for
pub const MAX_AUTOCOMPLETE_LIMIT: usize = 50;
/// Raw hits fetched per requested suggestion, to survive filtering
const AUTOCOMPLETE_OVERFETCH: usize = 5;

const EXCLUDED_DESCRIPTIONS: [&str; 9] = [
    "video game",
    "game of",
    "film",
    "movie",
    "album",
    "song",
    "television",
    "manga",
    "book",
];
const EXCLUDED_LABELS: [&str; 5] = ["soccer 64", "trial", "career", " game ", "the game"];

/// Keep hits describing a footballer, drop games and media about football
pub fn is_football_hit(hit: &SearchHit) -> bool {
    let description = hit.description.to_lowercase();
    let label = hit.label.to_lowercase();

    let football = description.contains("football") || description.contains("soccer");
    let excluded = EXCLUDED_DESCRIPTIONS.iter().any(|s| description.contains(s))
        || EXCLUDED_LABELS.iter().any(|s| label.contains(s));
    football && !excluded
}

#[derive(Clone)]
pub struct PlayerLookup {
    graph: Arc<dyn KnowledgeGraph>,
}

impl PlayerLookup {
    pub fn new(graph: Arc<dyn KnowledgeGraph>) -> Self {
        Self { graph }
    }

    /// Candidates for a typed name, most similar first
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<AthleteCandidate>> {
        let candidates = self.graph.find_athletes_by_name(name).await?;

        let mut scored: Vec<(f64, AthleteCandidate)> = candidates
            .into_iter()
            .map(|c| (similarity(name, &c.label), c))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored.into_iter().map(|(_, c)| c).collect())
    }

    /// Football-related suggestions; never fails
    pub async fn autocomplete(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let query = query.trim();
        if query.chars().count() < MIN_AUTOCOMPLETE_QUERY {
            return vec![];
        }
        let limit = limit.clamp(1, MAX_AUTOCOMPLETE_LIMIT);

        match self
            .graph
            .search_entities(query, limit.saturating_mul(AUTOCOMPLETE_OVERFETCH))
            .await
        {
            Ok(hits) => {
                let suggestions: Vec<SearchHit> = hits
                    .into_iter()
                    .filter(is_football_hit)
                    .take(limit)
                    .collect();
                info!("Autocomplete {:?}: {} results", query, suggestions.len());
                suggestions
            }
            Err(e) => {
                warn!("Autocomplete failed for {:?}: {}", query, e);
                vec![]
            }
        }
    }

    pub async fn details(&self, athlete_id: &str) -> Result<AthleteDetails> {
        self.graph.athlete_details(athlete_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, ResolveType};
    use crate::error::BoardError;
    use crate::graph::AthleteRef;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct SearchGraph {
        requested_limits: Mutex<Vec<usize>>,
        fail: bool,
    }

    fn hit(id: &str, label: &str, description: &str) -> SearchHit {
        SearchHit {
            id: id.into(),
            label: label.into(),
            description: description.into(),
        }
    }

    fn candidate(id: &str, label: &str) -> AthleteCandidate {
        AthleteCandidate {
            id: id.into(),
            label: label.into(),
            birth_year: None,
            place_of_birth: None,
            description: String::new(),
        }
    }

    #[async_trait]
    impl KnowledgeGraph for SearchGraph {
        async fn lookup_entities(&self, _: &str, _: ResolveType) -> Result<Vec<Entity>> {
            Ok(vec![])
        }

        async fn athletes_matching(&self, _: &Entity, _: &Entity) -> Result<Vec<AthleteRef>> {
            Ok(vec![])
        }

        async fn find_athletes_by_name(&self, _: &str) -> Result<Vec<AthleteCandidate>> {
            Ok(vec![
                candidate("Q1", "Ronaldinho"),
                candidate("Q2", "Cristiano Ronaldo"),
                candidate("Q3", "Ronaldo"),
                candidate("Q4", "Ronaldinho"),
            ])
        }

        async fn athlete_details(&self, _: &str) -> Result<AthleteDetails> {
            Ok(AthleteDetails::default())
        }

        async fn search_entities(&self, _: &str, limit: usize) -> Result<Vec<SearchHit>> {
            self.requested_limits.lock().unwrap().push(limit);
            if self.fail {
                return Err(BoardError::upstream("search timed out"));
            }
            Ok(vec![
                hit("Q11571", "Cristiano Ronaldo", "Portuguese association football player"),
                hit("Q1", "FIFA Soccer 64", "football video game"),
                hit("Q2", "Ronaldo: The Journey", "2015 film about a footballer"),
                hit("Q529207", "Ronaldo", "Brazilian association football player"),
                hit("Q3", "Ronaldo", "family name"),
                hit("Q4", "Ronaldo career statistics", "soccer statistics"),
            ])
        }
    }

    #[test]
    fn test_football_filter() {
        assert!(is_football_hit(&hit("Q1", "Pelé", "Brazilian soccer player")));
        assert!(!is_football_hit(&hit("Q1", "Pelé", "Brazilian singer")));
        assert!(!is_football_hit(&hit("Q1", "Pelé", "football book")));
        assert!(!is_football_hit(&hit("Q1", "The Game", "football match")));
    }

    #[tokio::test]
    async fn test_autocomplete_filters_and_limits() {
        let graph = Arc::new(SearchGraph::default());
        let lookup = PlayerLookup::new(graph.clone());

        let hits = lookup.autocomplete("Ronaldo", 10).await;
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["Q11571", "Q529207"]);
        assert_eq!(graph.requested_limits.lock().unwrap()[0], 50);

        assert_eq!(lookup.autocomplete("Ronaldo", 1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_autocomplete_clamps_huge_limit() {
        let graph = Arc::new(SearchGraph::default());
        let lookup = PlayerLookup::new(graph.clone());

        let limit: usize = "4611686018427387904".parse().unwrap();
        let hits = lookup.autocomplete("Ronaldo", limit).await;
        assert_eq!(hits.len(), 2);

        let requested = graph.requested_limits.lock().unwrap()[0];
        assert_eq!(requested, MAX_AUTOCOMPLETE_LIMIT * AUTOCOMPLETE_OVERFETCH);

        lookup.autocomplete("Ronaldo", usize::MAX).await;
        assert_eq!(graph.requested_limits.lock().unwrap()[1], requested);
    }

    #[tokio::test]
    async fn test_autocomplete_short_query_skips_request() {
        let graph = Arc::new(SearchGraph::default());
        let lookup = PlayerLookup::new(graph.clone());

        assert!(lookup.autocomplete("R", 10).await.is_empty());
        assert!(lookup.autocomplete("  ", 10).await.is_empty());
        assert!(graph.requested_limits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_autocomplete_swallows_errors() {
        let graph = Arc::new(SearchGraph {
            fail: true,
            ..Default::default()
        });
        let lookup = PlayerLookup::new(graph);
        assert!(lookup.autocomplete("Messi", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_name_ranks_by_similarity_stably() {
        let lookup = PlayerLookup::new(Arc::new(SearchGraph::default()));

        let ids: Vec<String> = lookup
            .find_by_name("ronaldo")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["Q3", "Q1", "Q4", "Q2"]);
    }
}
