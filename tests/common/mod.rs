//! Shared in-memory knowledge graph for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use box_to_box::board::generator::{CLUBS, COUNTRIES};
use box_to_box::entity::{Entity, EntityRef, EntityType, ResolveType};
use box_to_box::graph::{
    AthleteCandidate, AthleteDetails, AthleteRef, ClubSpell, KnowledgeGraph, SearchHit,
};
use box_to_box::local_index::{AthleteIndex, AthleteRecord};
use box_to_box::Result;

/// Graph stub: knows the generator pools, and either answers every
/// criterion pair with one athlete or answers nothing.
#[derive(Default)]
pub struct StubGraph {
    pub answer_everything: bool,
    pub matching_calls: AtomicUsize,
    pub matched_ids: Mutex<Vec<(String, String)>>,
    /// When set, criterion queries wait for a permit
    pub gate: Option<Arc<Semaphore>>,
    pub entered: Arc<Notify>,
}

impl StubGraph {
    pub fn answering() -> Self {
        Self {
            answer_everything: true,
            ..Default::default()
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            answer_everything: true,
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.matching_calls.load(Ordering::SeqCst)
    }
}

fn pool_id(prefix: u32, index: usize) -> String {
    format!("Q{}", prefix as usize + index)
}

#[async_trait]
impl KnowledgeGraph for StubGraph {
    async fn lookup_entities(&self, label: &str, kind: ResolveType) -> Result<Vec<Entity>> {
        if !self.answer_everything {
            return Ok(vec![]);
        }
        let country = COUNTRIES.iter().position(|c| c.eq_ignore_ascii_case(label));
        let club = CLUBS.iter().position(|c| c.eq_ignore_ascii_case(label));

        Ok(match (kind, country, club) {
            (ResolveType::Country | ResolveType::Auto, Some(i), _) => {
                vec![Entity::new(pool_id(1000, i), COUNTRIES[i], EntityType::Country, 200)]
            }
            (ResolveType::Club | ResolveType::Auto, _, Some(i)) => {
                vec![Entity::new(pool_id(2000, i), CLUBS[i], EntityType::Club, 100)]
            }
            _ => vec![],
        })
    }

    async fn athletes_matching(&self, a: &Entity, b: &Entity) -> Result<Vec<AthleteRef>> {
        self.matching_calls.fetch_add(1, Ordering::SeqCst);
        self.matched_ids
            .lock()
            .unwrap()
            .push((a.id.clone(), b.id.clone()));
        self.entered.notify_one();
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await;
        }

        if !self.answer_everything {
            return Ok(vec![]);
        }
        Ok(vec![EntityRef::new(
            format!("Q9{}{}", a.id.trim_start_matches('Q'), b.id.trim_start_matches('Q')),
            format!("Player of {} and {}", a.label, b.label),
        )])
    }

    async fn find_athletes_by_name(&self, name: &str) -> Result<Vec<AthleteCandidate>> {
        Ok(vec![AthleteCandidate {
            id: "Q615".into(),
            label: "Lionel Messi".into(),
            birth_year: Some(1987),
            place_of_birth: Some("Rosario".into()),
            description: format!("footballer matching {}", name),
        }])
    }

    async fn athlete_details(&self, _: &str) -> Result<AthleteDetails> {
        Ok(AthleteDetails {
            countries: vec![EntityRef::new(pool_id(1000, 0), "Argentina")],
            clubs: vec![ClubSpell {
                id: "Q7156".into(),
                label: "FC Barcelona".into(),
                start_year: Some(2004),
                end_year: Some(2021),
            }],
        })
    }

    async fn search_entities(&self, _: &str, _: usize) -> Result<Vec<SearchHit>> {
        Ok(vec![SearchHit {
            id: "Q615".into(),
            label: "Lionel Messi".into(),
            description: "Argentine association football player".into(),
        }])
    }
}

/// One record per pool country holding every achievement and every club,
/// so any sampled achievement cell has an answer
pub fn decorated_index() -> AthleteIndex {
    let records = COUNTRIES
        .iter()
        .map(|country| AthleteRecord {
            name: format!("Legend of {}", country),
            id: format!("MANUAL_legend_of_{}", country.to_lowercase().replace(' ', "_")),
            country: Some(country.to_string()),
            clubs: CLUBS.iter().map(|c| c.to_string()).collect(),
            world_cup_winner: true,
            champions_league_winner: true,
            ballon_dor: true,
            ..Default::default()
        })
        .collect();
    AthleteIndex::from_records(records)
}

pub fn messi_index() -> AthleteIndex {
    let mut messi = AthleteRecord {
        name: "Lionel Messi".into(),
        id: "MANUAL_lionel_messi".into(),
        country: Some("Argentina".into()),
        clubs: vec!["Barcelona".into(), "PSG".into()],
        ballon_dor: true,
        world_cup_winner: true,
        ..Default::default()
    };
    messi.ballon_dor_years.insert("2009".into());
    messi.world_cup_years.insert("2022".into());
    AthleteIndex::from_records(vec![messi])
}
