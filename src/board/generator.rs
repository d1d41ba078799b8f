//! Board Generator
//!
//! Samples a random layout from fixed category pools, validates it through
//! the precomputer and retries up to an attempt budget before falling back
//! to a board known to be playable.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use super::precompute::{AxisLabel, BoardPrecomputer};
use super::GRID_SIZE;
use crate::entity::{Achievement, ResolveType};

pub const COUNTRIES: [&str; 13] = [
    "Argentina",
    "Brazil",
    "Spain",
    "Germany",
    "France",
    "Italy",
    "England",
    "Portugal",
    "Netherlands",
    "Belgium",
    "Croatia",
    "Uruguay",
    "Mexico",
];

pub const CLUBS: [&str; 15] = [
    "Barcelona",
    "Real Madrid",
    "Manchester United",
    "Liverpool",
    "Chelsea",
    "Manchester City",
    "Arsenal",
    "Bayern Munich",
    "Borussia Dortmund",
    "PSG",
    "Juventus",
    "AC Milan",
    "Inter Milan",
    "Atletico Madrid",
    "Tottenham",
];

pub const FALLBACK_ROWS: [&str; 3] = ["Argentina", "Brazil", "Spain"];
pub const FALLBACK_COLS: [&str; 3] = ["Barcelona", "Real Madrid", "Manchester United"];

const MAX_ACHIEVEMENTS: usize = 2;

/// A sampled label with the type it was drawn as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub label: &'static str,
    pub kind: ResolveType,
}

impl Category {
    fn axis(&self) -> AxisLabel {
        AxisLabel::new(self.label, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    pub rows: Vec<Category>,
    pub cols: Vec<Category>,
}

impl BoardLayout {
    pub fn row_labels(&self) -> Vec<String> {
        self.rows.iter().map(|c| c.label.to_string()).collect()
    }

    pub fn col_labels(&self) -> Vec<String> {
        self.cols.iter().map(|c| c.label.to_string()).collect()
    }
}

fn pick<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[&'static str],
    count: usize,
    kind: ResolveType,
) -> Vec<Category> {
    pool.choose_multiple(rng, count)
        .map(|label| Category { label: *label, kind })
        .collect()
}

/// Sample a layout. Countries only ever land in rows; clubs and
/// achievements are shuffled to fill the remaining row slots and the
/// columns.
pub fn sample_layout<R: Rng + ?Sized>(rng: &mut R) -> BoardLayout {
    let slots = GRID_SIZE * 2;
    let achievements = rng.gen_range(0..=MAX_ACHIEVEMENTS);
    let countries = rng.gen_range(1..=GRID_SIZE.min(slots - achievements));
    let clubs = slots - achievements - countries;

    let achievement_labels: Vec<&'static str> = Achievement::ALL.iter().map(|a| a.label()).collect();

    let mut rows = pick(rng, &COUNTRIES, countries, ResolveType::Country);
    let mut rest = pick(rng, &CLUBS, clubs, ResolveType::Club);
    rest.extend(pick(rng, &achievement_labels, achievements, ResolveType::Achievement));
    rest.shuffle(rng);

    let cols = rest.split_off(GRID_SIZE - rows.len());
    rows.extend(rest);

    BoardLayout { rows, cols }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBoard {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub is_valid: bool,
    pub empty_cells: Vec<String>,
}

impl GeneratedBoard {
    pub fn fallback() -> Self {
        Self {
            row_labels: FALLBACK_ROWS.iter().map(|s| s.to_string()).collect(),
            col_labels: FALLBACK_COLS.iter().map(|s| s.to_string()).collect(),
            is_valid: true,
            empty_cells: vec![],
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.row_labels == FALLBACK_ROWS && self.col_labels == FALLBACK_COLS
    }
}

#[derive(Clone)]
pub struct BoardGenerator {
    precomputer: BoardPrecomputer,
}

impl BoardGenerator {
    pub fn new(precomputer: BoardPrecomputer) -> Self {
        Self { precomputer }
    }

    pub async fn generate(&self, max_attempts: usize) -> GeneratedBoard {
        let mut rng = StdRng::from_entropy();
        self.generate_with(&mut rng, max_attempts).await
    }

    /// Generate using the given random source
    pub async fn generate_with<R: Rng + Send>(&self, rng: &mut R, max_attempts: usize) -> GeneratedBoard {
        for attempt in 1..=max_attempts {
            let layout = sample_layout(rng);
            info!(
                "Attempt {}/{}: rows {:?}, cols {:?}",
                attempt,
                max_attempts,
                layout.row_labels(),
                layout.col_labels()
            );

            let rows: Vec<AxisLabel> = layout.rows.iter().map(Category::axis).collect();
            let cols: Vec<AxisLabel> = layout.cols.iter().map(Category::axis).collect();
            let board = self.precomputer.precompute_axes(&rows, &cols).await;

            let empty_cells = board.empty_cells();
            if empty_cells.is_empty() {
                info!("Valid board generated on attempt {}", attempt);
                return GeneratedBoard {
                    row_labels: layout.row_labels(),
                    col_labels: layout.col_labels(),
                    is_valid: true,
                    empty_cells,
                };
            }
            info!("Rejected board with {} empty cells: {:?}", empty_cells.len(), empty_cells);
        }

        warn!(
            "Could not generate a valid board in {} attempts, using default",
            max_attempts
        );
        GeneratedBoard::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_shape_and_placement() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let layout = sample_layout(&mut rng);
            assert_eq!(layout.rows.len(), GRID_SIZE);
            assert_eq!(layout.cols.len(), GRID_SIZE);
            assert!(layout.cols.iter().all(|c| c.kind != ResolveType::Country));

            let countries = layout.rows.iter().filter(|c| c.kind == ResolveType::Country).count();
            assert!((1..=GRID_SIZE).contains(&countries));

            let achievements = layout
                .rows
                .iter()
                .chain(&layout.cols)
                .filter(|c| c.kind == ResolveType::Achievement)
                .count();
            assert!(achievements <= MAX_ACHIEVEMENTS);
        }
    }

    #[test]
    fn test_layout_labels_are_unique() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let layout = sample_layout(&mut rng);
            let mut labels: Vec<&str> = layout.rows.iter().chain(&layout.cols).map(|c| c.label).collect();
            labels.sort_unstable();
            labels.dedup();
            assert_eq!(labels.len(), GRID_SIZE * 2);
        }
    }

    #[test]
    fn test_fallback_board() {
        let board = GeneratedBoard::fallback();
        assert!(board.is_valid);
        assert!(board.empty_cells.is_empty());
        assert!(board.is_fallback());
        assert_eq!(board.col_labels[2], "Manchester United");
    }
}
