//! Criterion Matcher
//!
//! Two rules live here:
//! - `match_both` (AND): every athlete satisfying both axes of a cell, used
//!   to precompute the exhaustive answer list
//! - `check_athlete_against_labels` (OR): the game rule for a single guess,
//!   which is valid when the athlete satisfies the row or the column.
//!   Achievement axes are answered from the local achievement index.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::entity::{Achievement, Entity, EntityResolver, EntityType, ResolveType};
use crate::error::Result;
use crate::graph::{AthleteDetails, AthleteRef, KnowledgeGraph};
use crate::local_index::{AthleteRecord, LocalAchievementIndex};
use crate::similarity::{best_match, format_period};

/// Which fact satisfied an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Nationality,
    Club,
    Achievement,
}

impl MatchKind {
    pub fn property(&self) -> &'static str {
        match self {
            MatchKind::Nationality => "P27 (country of citizenship)",
            MatchKind::Club => "P54 (member of sports team)",
            MatchKind::Achievement => "local achievement index",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchDetail {
    #[serde(rename = "type")]
    pub kind: MatchKind,
    pub property: String,
    pub entity: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub valid: bool,
    pub row_match: bool,
    pub col_match: bool,
    pub row_match_details: Option<MatchDetail>,
    pub col_match_details: Option<MatchDetail>,
    pub player_details: AthleteDetails,
}

#[derive(Clone)]
pub struct CriterionMatcher {
    graph: Arc<dyn KnowledgeGraph>,
    resolver: EntityResolver,
    achievements: Option<Arc<LocalAchievementIndex>>,
}

impl CriterionMatcher {
    pub fn new(graph: Arc<dyn KnowledgeGraph>, resolver: EntityResolver) -> Self {
        Self {
            graph,
            resolver,
            achievements: None,
        }
    }

    /// Answer achievement axes of the OR check from this index
    pub fn with_achievements(mut self, index: Arc<LocalAchievementIndex>) -> Self {
        self.achievements = Some(index);
        self
    }

    /// Athletes satisfying both criteria.
    ///
    /// A missing criterion or a failed query yields an empty list, never an
    /// error: an upstream hiccup makes a cell emptier instead of failing the
    /// whole board.
    pub async fn match_both(&self, row: Option<&Entity>, col: Option<&Entity>) -> Vec<AthleteRef> {
        let (Some(row), Some(col)) = (row, col) else {
            debug!("Both criteria are required for an AND match");
            return vec![];
        };

        match self.graph.athletes_matching(row, col).await {
            Ok(athletes) => {
                debug!(
                    "{} athletes match {} ({}) AND {} ({})",
                    athletes.len(),
                    row.label,
                    row.id,
                    col.label,
                    col.id
                );
                athletes
            }
            Err(e) => {
                warn!(
                    "Criterion query failed for {} x {}: {}",
                    row.id, col.id, e
                );
                vec![]
            }
        }
    }

    /// OR rule for one submitted athlete.
    ///
    /// The row is read as a nationality (falling back to a club when the
    /// label is not a country), the column as a club (falling back to a
    /// nationality). Achievement labels are checked against the local index,
    /// finding the athlete by id or by `athlete_name`. Failing to fetch the
    /// athlete's own facts is an error; failing to resolve a label only
    /// means that axis cannot match.
    pub async fn check_athlete_against_labels(
        &self,
        athlete_id: &str,
        athlete_name: Option<&str>,
        row_label: &str,
        col_label: &str,
    ) -> Result<MatchResult> {
        let details = self.graph.athlete_details(athlete_id).await?;

        let record = if [row_label, col_label]
            .iter()
            .any(|l| Achievement::from_label(l).is_some())
        {
            self.local_record(athlete_id, athlete_name)
        } else {
            None
        };

        let row_match_details = self
            .axis_result(&details, record.as_ref(), row_label, ResolveType::Country)
            .await;
        let col_match_details = self
            .axis_result(&details, record.as_ref(), col_label, ResolveType::Club)
            .await;

        let row_match = row_match_details.is_some();
        let col_match = col_match_details.is_some();
        info!(
            "Check {} against {:?} x {:?}: row={} col={}",
            athlete_id, row_label, col_label, row_match, col_match
        );

        Ok(MatchResult {
            valid: row_match || col_match,
            row_match,
            col_match,
            row_match_details,
            col_match_details,
            player_details: details,
        })
    }

    async fn axis_result(
        &self,
        details: &AthleteDetails,
        record: Option<&AthleteRecord>,
        label: &str,
        preferred: ResolveType,
    ) -> Option<MatchDetail> {
        if let Some(achievement) = Achievement::from_label(label) {
            return achievement_match(record?, achievement);
        }
        let candidates = self.candidates(label, preferred).await;
        best_match(label, &candidates).and_then(|entity| axis_match(details, entity))
    }

    fn local_record(&self, athlete_id: &str, athlete_name: Option<&str>) -> Option<AthleteRecord> {
        let index = self.achievements.as_ref()?;
        let record = index.find_athlete(athlete_id, athlete_name);
        if record.is_none() {
            debug!("{} ({:?}) is not in the local index", athlete_id, athlete_name);
        }
        record
    }

    async fn candidates(&self, label: &str, preferred: ResolveType) -> Vec<Entity> {
        match self.resolver.resolve_with_fallback(label, preferred).await {
            Ok(entities) => entities,
            Err(e) => {
                warn!("Could not resolve {:?}: {}", label, e);
                vec![]
            }
        }
    }
}

/// Does the athlete satisfy this single criterion?
pub fn axis_match(details: &AthleteDetails, entity: &Entity) -> Option<MatchDetail> {
    match entity.entity_type {
        EntityType::Country if details.has_nationality(&entity.id) => Some(MatchDetail {
            kind: MatchKind::Nationality,
            property: MatchKind::Nationality.property().to_string(),
            entity: entity.label.clone(),
            id: entity.id.clone(),
            period: None,
        }),
        EntityType::Club => details.spell_at(&entity.id).map(|spell| MatchDetail {
            kind: MatchKind::Club,
            property: MatchKind::Club.property().to_string(),
            entity: entity.label.clone(),
            id: entity.id.clone(),
            period: Some(format_period(spell.start_year, spell.end_year)),
        }),
        _ => None,
    }
}

/// Does the local record hold this achievement? Years become the period.
pub fn achievement_match(record: &AthleteRecord, achievement: Achievement) -> Option<MatchDetail> {
    if !record.has(achievement) {
        return None;
    }
    let years = record.years_for(achievement);
    Some(MatchDetail {
        kind: MatchKind::Achievement,
        property: MatchKind::Achievement.property().to_string(),
        entity: achievement.label().to_string(),
        id: achievement.id().to_string(),
        period: (!years.is_empty()).then(|| years.iter().cloned().collect::<Vec<_>>().join(", ")),
    })
}
