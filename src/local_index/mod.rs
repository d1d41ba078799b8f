//! Local Achievement Index
//!
//! In-memory athlete table answering cells the live graph cannot query
//! efficiently (World Cup, Champions League and Ballon d'Or winners).
//!
//! - `AthleteRecord` / `AthleteIndex`: the immutable table and its queries
//! - `build`: folding the curated achievements file and deduplicating
//! - `loader`: the once-initialized handle shared by all requests

pub mod build;
pub mod loader;

pub use build::{deduplicate, fold_manual, ManualAchievements};
pub use loader::LocalAchievementIndex;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Datelike;
use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::{Achievement, Entity, EntityRef, EntityType};
use crate::graph::AthleteRef;

pub const MANUAL_ID_PREFIX: &str = "MANUAL_";
pub const SEARCH_RESULT_LIMIT: usize = 15;
const EARLIEST_CAREER_YEAR: i32 = 1950;

/// One athlete in the local table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteRecord {
    pub name: String,
    #[serde(alias = "qid")]
    pub id: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub clubs: Vec<String>,
    #[serde(default)]
    pub world_cup_winner: bool,
    #[serde(default, deserialize_with = "year_set")]
    pub world_cup_years: BTreeSet<String>,
    #[serde(default)]
    pub champions_league_winner: bool,
    #[serde(default, deserialize_with = "year_set")]
    pub champions_league_years: BTreeSet<String>,
    #[serde(default)]
    pub ballon_dor: bool,
    #[serde(default, deserialize_with = "year_set")]
    pub ballon_dor_years: BTreeSet<String>,
}

/// Years appear both as numbers and as strings in curated data
fn year_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i64),
        Text(String),
    }

    let years: Option<Vec<Year>> = Option::deserialize(deserializer)?;
    Ok(years
        .unwrap_or_default()
        .into_iter()
        .map(|y| match y {
            Year::Number(n) => n.to_string(),
            Year::Text(s) => s.trim().to_string(),
        })
        .collect())
}

impl AthleteRecord {
    /// Case-insensitive deduplication key
    pub fn key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    pub fn is_manual(&self) -> bool {
        self.id.starts_with(MANUAL_ID_PREFIX)
    }

    pub fn has(&self, achievement: Achievement) -> bool {
        match achievement {
            Achievement::WorldCup => self.world_cup_winner,
            Achievement::ChampionsLeague => self.champions_league_winner,
            Achievement::BallonDor => self.ballon_dor,
        }
    }

    /// Winning years recorded for one achievement
    pub fn years_for(&self, achievement: Achievement) -> &BTreeSet<String> {
        match achievement {
            Achievement::WorldCup => &self.world_cup_years,
            Achievement::ChampionsLeague => &self.champions_league_years,
            Achievement::BallonDor => &self.ballon_dor_years,
        }
    }

    pub fn achievement_count(&self) -> usize {
        Achievement::ALL.iter().filter(|a| self.has(**a)).count()
    }

    /// Append clubs not already present (case-insensitive), keeping order
    pub fn add_clubs<'a>(&mut self, clubs: impl IntoIterator<Item = &'a String>) {
        for club in clubs {
            let lower = club.to_lowercase();
            if !self.clubs.iter().any(|c| c.to_lowercase() == lower) {
                self.clubs.push(club.clone());
            }
        }
    }

    /// Does this athlete satisfy a single criterion?
    ///
    /// Countries compare exactly (ignoring case); clubs match by substring in
    /// either direction so "Barcelona" and "FC Barcelona" agree.
    pub fn matches(&self, criterion: &Entity) -> bool {
        if let Some(achievement) = criterion.achievement() {
            return self.has(achievement);
        }

        let wanted = criterion.label.trim().to_lowercase();
        if wanted.is_empty() {
            return false;
        }
        match criterion.entity_type {
            EntityType::Country => self
                .country
                .as_deref()
                .map(|c| c.trim().to_lowercase() == wanted)
                .unwrap_or(false),
            EntityType::Club => self.clubs.iter().any(|club| {
                let club = club.to_lowercase();
                !club.is_empty() && (club.contains(&wanted) || wanted.contains(&club))
            }),
            EntityType::Achievement => false,
        }
    }

    fn all_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.world_cup_years
            .iter()
            .chain(&self.champions_league_years)
            .chain(&self.ballon_dor_years)
            .filter_map(|y| y.parse::<i32>().ok())
    }

    /// Rough career span around the achievement years, e.g. "2004-2024"
    pub fn estimated_career(&self, latest_year: i32) -> Option<String> {
        let first = self.all_years().min()?;
        let last = self.all_years().max()?;
        let start = (first - 5).max(EARLIEST_CAREER_YEAR);
        let end = (last + 3).min(latest_year);
        Some(format!("{}-{}", start, end))
    }
}

/// Hit from a local name search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSearchHit {
    pub id: String,
    pub label: String,
    pub country: Option<String>,
    pub years: Option<String>,
    pub clubs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub total_players: usize,
    pub with_clubs: usize,
    pub world_cup_winners: usize,
    pub champions_league_winners: usize,
    pub ballon_dor_winners: usize,
    pub by_country: BTreeMap<String, usize>,
}

/// Immutable, deduplicated athlete table
#[derive(Debug, Default)]
pub struct AthleteIndex {
    records: Vec<AthleteRecord>,
}

impl AthleteIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw records, deduplicating by name
    pub fn from_records(records: Vec<AthleteRecord>) -> Self {
        Self {
            records: deduplicate(records),
        }
    }

    pub fn records(&self) -> &[AthleteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Athletes satisfying both criteria (AND)
    pub fn find(&self, a: &Entity, b: &Entity) -> Vec<AthleteRef> {
        self.records
            .iter()
            .filter(|r| r.matches(a) && r.matches(b))
            .map(|r| EntityRef::new(r.id.clone(), r.name.clone()))
            .collect()
    }

    /// One athlete by id, or failing that by exact (case-insensitive) name
    pub fn find_athlete(&self, id: &str, name: Option<&str>) -> Option<&AthleteRecord> {
        self.records.iter().find(|r| r.id == id).or_else(|| {
            let key = name?.trim().to_lowercase();
            self.records.iter().find(|r| !key.is_empty() && r.key() == key)
        })
    }

    /// Substring name search: exact matches first, then the most decorated
    pub fn search_by_name(&self, query: &str) -> Vec<LocalSearchHit> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return vec![];
        }
        let latest_year = chrono::Utc::now().year();

        let mut hits: Vec<&AthleteRecord> = self
            .records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&normalized))
            .collect();
        hits.sort_by_key(|r| (r.key() != normalized, std::cmp::Reverse(r.achievement_count())));

        hits.into_iter()
            .take(SEARCH_RESULT_LIMIT)
            .map(|r| LocalSearchHit {
                id: r.id.clone(),
                label: r.name.clone(),
                country: r.country.clone(),
                years: r.estimated_career(latest_year),
                clubs: r.clubs.clone(),
            })
            .collect()
    }

    pub fn stats(&self) -> IndexStats {
        let mut by_country: HashMap<String, usize> = HashMap::new();
        for record in &self.records {
            let country = record
                .country
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Unknown".to_string());
            *by_country.entry(country).or_default() += 1;
        }

        IndexStats {
            total_players: self.records.len(),
            with_clubs: self.records.iter().filter(|r| !r.clubs.is_empty()).count(),
            world_cup_winners: self.records.iter().filter(|r| r.world_cup_winner).count(),
            champions_league_winners: self
                .records
                .iter()
                .filter(|r| r.champions_league_winner)
                .count(),
            ballon_dor_winners: self.records.iter().filter(|r| r.ballon_dor).count(),
            by_country: by_country.into_iter().collect(),
        }
    }
}
