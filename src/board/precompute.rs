//! Board Precomputer
//!
//! Resolves the six axis labels once, fans the nine cells out concurrently
//! and inverts the per-cell answer lists into a single athlete -> cells
//! index. A failing cell contributes an empty result; it never fails the
//! board.

use std::collections::{BTreeMap, HashMap};

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::cell::{CellEvaluator, CellResult};
use super::{cell_key, GRID_SIZE};
use crate::entity::{Achievement, Entity, EntityResolver, ResolveType};
use crate::error::{BoardError, Result};
use crate::similarity::best_match;

/// An athlete and every cell they answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardAthlete {
    pub id: String,
    pub label: String,
    pub valid_cells: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPrecomputation {
    pub cells: BTreeMap<String, CellResult>,
    pub all_athletes: Vec<BoardAthlete>,
    pub player_count: usize,
}

impl BoardPrecomputation {
    /// Fold cell results (in processing order) into the athlete index.
    /// Athletes are keyed by lowercased name.
    pub fn from_cells(cells: Vec<(String, CellResult)>) -> Self {
        let mut all_athletes: Vec<BoardAthlete> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for (key, cell) in &cells {
            for athlete in &cell.athletes {
                let position = *by_name
                    .entry(athlete.label.to_lowercase())
                    .or_insert_with(|| {
                        all_athletes.push(BoardAthlete {
                            id: athlete.id.clone(),
                            label: athlete.label.clone(),
                            valid_cells: Vec::new(),
                        });
                        all_athletes.len() - 1
                    });
                let valid_cells = &mut all_athletes[position].valid_cells;
                if !valid_cells.contains(key) {
                    valid_cells.push(key.clone());
                }
            }
        }

        Self {
            player_count: all_athletes.len(),
            all_athletes,
            cells: cells.into_iter().collect(),
        }
    }

    /// Keys of cells nobody can answer, row-major
    pub fn empty_cells(&self) -> Vec<String> {
        self.cells
            .iter()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.cells.len() == GRID_SIZE * GRID_SIZE && self.empty_cells().is_empty()
    }

    /// Look a typed name up: exact (case-insensitive) first, then substring
    /// in either direction
    pub fn find_athlete_cells(&self, name: &str) -> Option<&BoardAthlete> {
        let input = name.trim().to_lowercase();
        if input.is_empty() {
            return None;
        }
        self.all_athletes
            .iter()
            .find(|a| a.label.to_lowercase() == input)
            .or_else(|| {
                self.all_athletes.iter().find(|a| {
                    let label = a.label.to_lowercase();
                    label.contains(&input) || input.contains(&label)
                })
            })
    }
}

/// A board needs exactly three row and three column labels
pub fn check_labels(row_labels: &[String], col_labels: &[String]) -> Result<()> {
    if row_labels.len() != GRID_SIZE || col_labels.len() != GRID_SIZE {
        return Err(BoardError::InvalidParameter(format!(
            "rowLabels and colLabels arrays with {} items each are required",
            GRID_SIZE
        )));
    }
    Ok(())
}

/// A label together with the type to try first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabel {
    pub label: String,
    pub preferred: ResolveType,
}

impl AxisLabel {
    pub fn new(label: impl Into<String>, preferred: ResolveType) -> Self {
        Self {
            label: label.into(),
            preferred,
        }
    }
}

#[derive(Clone)]
pub struct BoardPrecomputer {
    resolver: EntityResolver,
    evaluator: CellEvaluator,
}

impl BoardPrecomputer {
    pub fn new(resolver: EntityResolver, evaluator: CellEvaluator) -> Self {
        Self {
            resolver,
            evaluator,
        }
    }

    /// Precompute a board from raw labels; rows prefer countries, columns
    /// prefer clubs
    pub async fn precompute(
        &self,
        row_labels: &[String],
        col_labels: &[String],
    ) -> Result<BoardPrecomputation> {
        check_labels(row_labels, col_labels)?;

        let rows: Vec<AxisLabel> = row_labels
            .iter()
            .map(|l| AxisLabel::new(l.as_str(), ResolveType::Country))
            .collect();
        let cols: Vec<AxisLabel> = col_labels
            .iter()
            .map(|l| AxisLabel::new(l.as_str(), ResolveType::Club))
            .collect();

        info!("Precomputing board {:?} x {:?}", row_labels, col_labels);
        Ok(self.precompute_axes(&rows, &cols).await)
    }

    /// Precompute with explicit type hints per axis label
    pub async fn precompute_axes(&self, rows: &[AxisLabel], cols: &[AxisLabel]) -> BoardPrecomputation {
        let (row_entities, col_entities) = futures::join!(
            join_all(rows.iter().map(|axis| self.resolve_axis(axis))),
            join_all(cols.iter().map(|axis| self.resolve_axis(axis))),
        );

        let mut pending = Vec::with_capacity(rows.len() * cols.len());
        for (r, row) in row_entities.iter().enumerate() {
            for (c, col) in col_entities.iter().enumerate() {
                pending.push(async move {
                    let athletes = self.evaluator.evaluate(row.as_ref(), col.as_ref()).await;
                    debug!("Cell {}-{}: {} athletes", r, c, athletes.len());
                    (cell_key(r, c), CellResult::new(row.clone(), col.clone(), athletes))
                });
            }
        }

        // join_all keeps submission order, so folding stays row-major
        let board = BoardPrecomputation::from_cells(join_all(pending).await);
        info!("Precomputed {} unique athletes across all cells", board.player_count);
        board
    }

    /// Best entity for one axis label; unresolvable or failed labels give None
    async fn resolve_axis(&self, axis: &AxisLabel) -> Option<Entity> {
        if let Some(achievement) = Achievement::from_label(&axis.label) {
            return Some(achievement.entity());
        }

        match self
            .resolver
            .resolve_with_fallback(&axis.label, axis.preferred)
            .await
        {
            Ok(entities) => {
                let best = best_match(&axis.label, &entities).cloned();
                if best.is_none() {
                    warn!("No entity found for {:?}", axis.label);
                }
                best
            }
            Err(e) => {
                warn!("Failed to resolve {:?}: {}", axis.label, e);
                None
            }
        }
    }
}
