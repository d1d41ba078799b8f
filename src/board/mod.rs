//! Board precomputation and random board generation
//!
//! - `cell`: per-cell routing between the local index and the live graph
//! - `precompute`: nine-cell fan-out and the athlete -> cells index
//! - `sequencer`: generation tokens for superseded precomputations
//! - `generator`: random sampling with bounded retries and a fallback board

pub mod cell;
pub mod generator;
pub mod precompute;
pub mod sequencer;

pub use cell::{CellEvaluator, CellResult};
pub use generator::{BoardGenerator, GeneratedBoard};
pub use precompute::{check_labels, AxisLabel, BoardAthlete, BoardPrecomputation, BoardPrecomputer};
pub use sequencer::{GenerationToken, PrecomputeSequencer};

pub const GRID_SIZE: usize = 3;
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Cell key such as "1-2" (row, column)
pub fn cell_key(row: usize, col: usize) -> String {
    format!("{}-{}", row, col)
}
