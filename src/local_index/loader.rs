//! Once-initialized handle to the athlete table.
//!
//! The first caller reads both data files and builds the table; every later
//! caller (and every concurrent caller racing the first) gets the same
//! `Arc`. A missing or unreadable file is logged and treated as empty, and
//! that outcome is cached too.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use super::build::{fold_manual, ManualAchievements};
use super::{AthleteIndex, AthleteRecord, IndexStats, LocalSearchHit};
use crate::config::AppConfig;
use crate::entity::Entity;
use crate::error::{BoardError, Result};
use crate::graph::AthleteRef;

pub struct LocalAchievementIndex {
    athlete_index_path: PathBuf,
    manual_path: PathBuf,
    cell: OnceLock<Arc<AthleteIndex>>,
    loads: AtomicUsize,
}

impl LocalAchievementIndex {
    pub fn new(athlete_index_path: impl Into<PathBuf>, manual_path: impl Into<PathBuf>) -> Self {
        Self {
            athlete_index_path: athlete_index_path.into(),
            manual_path: manual_path.into(),
            cell: OnceLock::new(),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.athlete_index_path, &config.manual_achievements_path)
    }

    /// Handle over an already-built table; no files are read
    pub fn with_table(table: AthleteIndex) -> Self {
        let index = Self::new(PathBuf::new(), PathBuf::new());
        let _ = index.cell.set(Arc::new(table));
        index
    }

    /// The table, loading it on first use
    pub fn load_once(&self) -> Arc<AthleteIndex> {
        self.cell
            .get_or_init(|| {
                self.loads.fetch_add(1, Ordering::SeqCst);
                Arc::new(self.load())
            })
            .clone()
    }

    /// How many times the backing files were actually read
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn find(&self, a: &Entity, b: &Entity) -> Vec<AthleteRef> {
        self.load_once().find(a, b)
    }

    pub fn search_by_name(&self, query: &str) -> Vec<LocalSearchHit> {
        self.load_once().search_by_name(query)
    }

    pub fn find_athlete(&self, id: &str, name: Option<&str>) -> Option<AthleteRecord> {
        self.load_once().find_athlete(id, name).cloned()
    }

    pub fn stats(&self) -> IndexStats {
        self.load_once().stats()
    }

    fn load(&self) -> AthleteIndex {
        let mut records: Vec<AthleteRecord> =
            read_optional(&self.athlete_index_path).unwrap_or_default();
        let from_index = records.len();

        let manual: ManualAchievements = read_optional(&self.manual_path).unwrap_or_default();
        let curated = fold_manual(&manual);
        let from_manual = curated.len();
        records.extend(curated);

        let table = AthleteIndex::from_records(records);
        if table.is_empty() {
            warn!(
                "Local achievement index is empty ({} and {} missing or unreadable)",
                self.athlete_index_path.display(),
                self.manual_path.display()
            );
        } else {
            info!(
                "Loaded {} athletes into local index ({} indexed, {} curated before dedup)",
                table.len(),
                from_index,
                from_manual
            );
        }
        table
    }
}

/// Parse a JSON file, logging and returning None when it is absent or bad
fn read_optional<T: DeserializeOwned>(path: &Path) -> Option<T> {
    match read_json(path) {
        Ok(value) => Some(value),
        Err(e @ BoardError::DatabaseUnavailable { .. }) if !path.exists() => {
            warn!("{}", e);
            None
        }
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let unavailable = |reason: String| BoardError::DatabaseUnavailable {
        path: path.to_path_buf(),
        reason,
    };
    let text = std::fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| unavailable(format!("invalid JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Achievement, EntityType};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const PLAYERS: &str = r#"[
        {"name": "Kaká", "qid": "Q83425", "country": "Brazil", "clubs": ["AC Milan"],
         "championsLeagueWinner": true, "championsLeagueYears": ["2007"]},
        {"name": "Andrea Pirlo", "id": "Q40972", "country": "Italy", "clubs": ["AC Milan", "Juventus"],
         "worldCupWinner": true, "worldCupYears": ["2006"]}
    ]"#;

    const MANUAL: &str = r#"{
        "ballonDorWinners": [
            {"name": "Kaká", "country": "Brazil", "clubs": ["AC Milan", "Real Madrid"], "years": [2007]}
        ]
    }"#;

    #[test]
    fn test_load_once_is_idempotent() {
        let players = json_file(PLAYERS);
        let index = LocalAchievementIndex::new(players.path(), "/nonexistent/manual.json");

        let first = index.load_once();
        let second = index.load_once();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(index.loads(), 1);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_missing_files_yield_cached_empty_table() {
        let index = LocalAchievementIndex::new("/nonexistent/a.json", "/nonexistent/b.json");
        assert!(index.load_once().is_empty());
        assert!(index.load_once().is_empty());
        assert_eq!(index.loads(), 1);
        assert_eq!(index.stats().total_players, 0);
    }

    #[test]
    fn test_corrupt_file_is_treated_as_absent() {
        let players = json_file("{ not json");
        let manual = json_file(MANUAL);
        let index = LocalAchievementIndex::new(players.path(), manual.path());

        let table = index.load_once();
        assert_eq!(table.len(), 1);
        assert!(table.records()[0].is_manual());
    }

    #[test]
    fn test_curated_record_replaces_indexed_duplicate() {
        let players = json_file(PLAYERS);
        let manual = json_file(MANUAL);
        let index = LocalAchievementIndex::new(players.path(), manual.path());

        let milan = Entity::new("Q1543", "AC Milan", EntityType::Club, 1);
        let ballon = Achievement::BallonDor.entity();
        let winners = index.find(&milan, &ballon);
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].id, "MANUAL_kaká");

        // The curated Kaká carries no Champions League flag
        let cl = Achievement::ChampionsLeague.entity();
        assert!(index.find(&milan, &cl).is_empty());

        let italy = Entity::new("Q38", "Italy", EntityType::Country, 1);
        let world_cup = Achievement::WorldCup.entity();
        assert_eq!(index.find(&italy, &world_cup)[0].label, "Andrea Pirlo");
    }

    #[test]
    fn test_with_table_skips_files() {
        let index = LocalAchievementIndex::with_table(AthleteIndex::empty());
        assert!(index.load_once().is_empty());
        assert_eq!(index.loads(), 0);
    }
}
