//! Building the athlete table: folding the curated achievements file into
//! records and collapsing duplicate names.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

use super::{AthleteRecord, MANUAL_ID_PREFIX};
use crate::entity::Achievement;

/// Curated achievements file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAchievements {
    #[serde(default)]
    pub ballon_dor_winners: Vec<BallonDorEntry>,
    /// Tournament year -> squad
    #[serde(default)]
    pub world_cup_winners: BTreeMap<String, Vec<WinnerEntry>>,
    #[serde(default)]
    pub champions_league_winners: BTreeMap<String, Vec<WinnerEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BallonDorEntry {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub clubs: Vec<String>,
    #[serde(default, deserialize_with = "super::year_set")]
    pub years: BTreeSet<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WinnerEntry {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub clubs: Vec<String>,
}

/// Stable id for a curated athlete, e.g. "MANUAL_luka_modrić"
pub fn manual_id(name: &str) -> String {
    let key: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{}{}", MANUAL_ID_PREFIX, key)
}

/// Insertion-ordered records keyed by lowercase name
#[derive(Default)]
struct Folder {
    records: Vec<AthleteRecord>,
    positions: HashMap<String, usize>,
}

impl Folder {
    fn entry(&mut self, name: &str, country: Option<&String>, clubs: &[String]) -> &mut AthleteRecord {
        let key = name.trim().to_lowercase();
        let index = match self.positions.get(&key) {
            Some(&i) => i,
            None => {
                self.records.push(AthleteRecord {
                    name: name.trim().to_string(),
                    id: manual_id(name),
                    ..Default::default()
                });
                self.positions.insert(key, self.records.len() - 1);
                self.records.len() - 1
            }
        };

        let record = &mut self.records[index];
        if record.country.is_none() {
            record.country = country.filter(|c| !c.is_empty()).cloned();
        }
        record.add_clubs(clubs);
        record
    }

    fn award(&mut self, achievement: Achievement, year: &str, entry: &WinnerEntry) {
        let record = self.entry(&entry.name, entry.country.as_ref(), &entry.clubs);
        let year = year.trim().to_string();
        match achievement {
            Achievement::WorldCup => {
                record.world_cup_winner = true;
                record.world_cup_years.insert(year);
            }
            Achievement::ChampionsLeague => {
                record.champions_league_winner = true;
                record.champions_league_years.insert(year);
            }
            Achievement::BallonDor => {
                record.ballon_dor = true;
                record.ballon_dor_years.insert(year);
            }
        }
    }
}

/// One record per curated name, with every award it appears under merged in
pub fn fold_manual(manual: &ManualAchievements) -> Vec<AthleteRecord> {
    let mut folder = Folder::default();

    for winner in &manual.ballon_dor_winners {
        let record = folder.entry(&winner.name, winner.country.as_ref(), &winner.clubs);
        record.ballon_dor = true;
        record.ballon_dor_years.extend(winner.years.iter().cloned());
    }
    for (year, squad) in &manual.world_cup_winners {
        for entry in squad {
            folder.award(Achievement::WorldCup, year, entry);
        }
    }
    for (year, squad) in &manual.champions_league_winners {
        for entry in squad {
            folder.award(Achievement::ChampionsLeague, year, entry);
        }
    }

    folder.records
}

/// Collapse records sharing a name (case-insensitive).
///
/// A curated record always wins its group. Otherwise the record with the
/// most achievements wins, the earliest one on ties. Groups keep the order
/// in which each name was first seen.
pub fn deduplicate(records: Vec<AthleteRecord>) -> Vec<AthleteRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<AthleteRecord>> = HashMap::new();
    for record in records {
        let key = record.key();
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(record);
    }

    order
        .into_iter()
        .filter_map(|key| {
            let group = groups.remove(&key)?;
            if let Some(manual) = group.iter().position(AthleteRecord::is_manual) {
                return group.into_iter().nth(manual);
            }
            group.into_iter().reduce(|best, candidate| {
                if candidate.achievement_count() > best.achievement_count() {
                    candidate
                } else {
                    best
                }
            })
        })
        .collect()
}
