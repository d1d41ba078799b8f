//! One grid cell: routing to the right data source and the cell's answer list.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::entity::{Entity, EntityType};
use crate::graph::AthleteRef;
use crate::local_index::LocalAchievementIndex;
use crate::matching::CriterionMatcher;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellResult {
    pub row_entity: Option<Entity>,
    pub col_entity: Option<Entity>,
    pub athletes: Vec<AthleteRef>,
    pub count: usize,
}

impl CellResult {
    pub fn new(row: Option<Entity>, col: Option<Entity>, athletes: Vec<AthleteRef>) -> Self {
        Self {
            row_entity: row,
            col_entity: col,
            count: athletes.len(),
            athletes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.athletes.is_empty()
    }

    /// Quick check of a typed name against this cell's answers (exact, then
    /// the answer label containing the input)
    pub fn validate(&self, name: &str) -> Option<&AthleteRef> {
        let input = name.trim().to_lowercase();
        if input.is_empty() {
            return None;
        }
        self.athletes
            .iter()
            .find(|a| a.label.to_lowercase() == input)
            .or_else(|| {
                self.athletes
                    .iter()
                    .find(|a| a.label.to_lowercase().contains(&input))
            })
    }
}

fn uses_local_index(entity: &Entity) -> bool {
    entity.entity_type == EntityType::Achievement
}

/// Answers a cell from the local index when an achievement participates,
/// otherwise from the live graph.
#[derive(Clone)]
pub struct CellEvaluator {
    matcher: CriterionMatcher,
    index: Arc<LocalAchievementIndex>,
}

impl CellEvaluator {
    pub fn new(matcher: CriterionMatcher, index: Arc<LocalAchievementIndex>) -> Self {
        Self { matcher, index }
    }

    pub async fn evaluate(&self, row: Option<&Entity>, col: Option<&Entity>) -> Vec<AthleteRef> {
        match (row, col) {
            (Some(r), Some(c)) if uses_local_index(r) || uses_local_index(c) => {
                let athletes = self.index.find(r, c);
                debug!(
                    "Local index: {} x {} -> {} athletes",
                    r.label,
                    c.label,
                    athletes.len()
                );
                athletes
            }
            _ => self.matcher.match_both(row, col).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityRef;

    fn cell() -> CellResult {
        CellResult::new(
            None,
            None,
            vec![
                EntityRef::new("Q1", "Ronaldo Nazário"),
                EntityRef::new("Q2", "Ronaldo"),
            ],
        )
    }

    #[test]
    fn test_validate_prefers_exact() {
        assert_eq!(cell().validate("ronaldo ").unwrap().id, "Q2");
        assert_eq!(cell().validate("Nazário").unwrap().id, "Q1");
        assert!(cell().validate("Rivaldo").is_none());
        assert!(cell().validate("").is_none());
    }

    #[test]
    fn test_count_tracks_athletes() {
        assert_eq!(cell().count, 2);
        assert!(CellResult::default().is_empty());
    }
}
