//! HTTP API
//!
//! Thin axum layer over the game services. `AppState` is assembled once at
//! the composition root and cloned into every handler.

pub mod error;
pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;

use std::sync::Arc;

use crate::board::{BoardGenerator, BoardPrecomputer, CellEvaluator, PrecomputeSequencer};
use crate::entity::EntityResolver;
use crate::graph::KnowledgeGraph;
use crate::local_index::LocalAchievementIndex;
use crate::lookup::PlayerLookup;
use crate::matching::CriterionMatcher;

#[derive(Clone)]
pub struct AppState {
    pub resolver: EntityResolver,
    pub matcher: CriterionMatcher,
    pub lookup: PlayerLookup,
    pub index: Arc<LocalAchievementIndex>,
    pub precomputer: BoardPrecomputer,
    pub generator: BoardGenerator,
    pub sequencer: Arc<PrecomputeSequencer>,
    pub max_attempts: usize,
}

impl AppState {
    pub fn new(
        graph: Arc<dyn KnowledgeGraph>,
        index: Arc<LocalAchievementIndex>,
        max_attempts: usize,
    ) -> Self {
        let resolver = EntityResolver::new(graph.clone());
        let matcher =
            CriterionMatcher::new(graph.clone(), resolver.clone()).with_achievements(index.clone());
        let evaluator = CellEvaluator::new(matcher.clone(), index.clone());
        let precomputer = BoardPrecomputer::new(resolver.clone(), evaluator);

        Self {
            generator: BoardGenerator::new(precomputer.clone()),
            lookup: PlayerLookup::new(graph),
            sequencer: Arc::new(PrecomputeSequencer::new()),
            resolver,
            matcher,
            index,
            precomputer,
            max_attempts,
        }
    }
}
