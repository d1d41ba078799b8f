//! End-to-end board precomputation and generation against stub data.

mod common;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use box_to_box::board::generator::COUNTRIES;
use box_to_box::board::{BoardGenerator, BoardPrecomputer, CellEvaluator};
use box_to_box::entity::{Achievement, EntityResolver};
use box_to_box::graph::KnowledgeGraph;
use box_to_box::local_index::{AthleteIndex, LocalAchievementIndex};
use box_to_box::matching::CriterionMatcher;

use common::{decorated_index, messi_index, StubGraph};

fn precomputer(graph: Arc<StubGraph>, table: AthleteIndex) -> BoardPrecomputer {
    let graph: Arc<dyn KnowledgeGraph> = graph;
    let resolver = EntityResolver::new(graph.clone());
    let matcher = CriterionMatcher::new(graph, resolver.clone());
    let index = Arc::new(LocalAchievementIndex::with_table(table));
    BoardPrecomputer::new(resolver, CellEvaluator::new(matcher, index))
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_ballon_dor_column_uses_local_index() {
    let graph = Arc::new(StubGraph::answering());
    let board = precomputer(graph.clone(), messi_index())
        .precompute(
            &labels(&["Argentina", "Brazil", "Spain"]),
            &labels(&["Barcelona", "Real Madrid", "Ballon d'Or Winner"]),
        )
        .await
        .unwrap();

    // Six graph cells; the achievement column never reaches the graph
    assert_eq!(graph.calls(), 6);
    let ballon = Achievement::BallonDor.id();
    assert!(graph
        .matched_ids
        .lock()
        .unwrap()
        .iter()
        .all(|(a, b)| a != ballon && b != ballon));

    let argentina_ballon = &board.cells["0-2"];
    assert_eq!(argentina_ballon.count, 1);
    assert_eq!(argentina_ballon.athletes[0].id, "MANUAL_lionel_messi");
    assert_eq!(argentina_ballon.col_entity.as_ref().unwrap().id, ballon);
    assert!(board.cells["1-2"].is_empty());

    let barcelona = &board.cells["0-0"];
    assert_eq!(barcelona.col_entity.as_ref().unwrap().id, "Q7156");
    assert_eq!(barcelona.count, 1);

    let messi = board.find_athlete_cells("lionel messi").unwrap();
    assert_eq!(messi.valid_cells, vec!["0-2"]);
    assert_eq!(board.empty_cells(), vec!["1-2", "2-2"]);
}

#[tokio::test]
async fn test_club_in_row_falls_back_from_country() {
    let graph = Arc::new(StubGraph::answering());
    let board = precomputer(graph, AthleteIndex::empty())
        .precompute(
            &labels(&["Chelsea", "Brazil", "Spain"]),
            &labels(&["Barcelona", "Juventus", "Arsenal"]),
        )
        .await
        .unwrap();

    let row = board.cells["0-1"].row_entity.as_ref().unwrap();
    assert_eq!(row.id, "Q9616");
    assert!(board.is_valid());
    assert_eq!(board.player_count, 9);
}

#[tokio::test]
async fn test_unresolvable_labels_yield_empty_cells() {
    let graph = Arc::new(StubGraph::silent());
    let board = precomputer(graph.clone(), AthleteIndex::empty())
        .precompute(
            &labels(&["Atlantis", "Brazil", "Spain"]),
            &labels(&["Nowhere FC", "Real Madrid", "World Cup Winner"]),
        )
        .await
        .unwrap();

    assert_eq!(board.cells.len(), 9);
    assert!(board.cells["0-0"].row_entity.is_none());
    assert_eq!(board.empty_cells().len(), 9);
    assert_eq!(board.player_count, 0);
}

#[tokio::test]
async fn test_precompute_rejects_wrong_axis_length() {
    let graph = Arc::new(StubGraph::answering());
    let err = precomputer(graph.clone(), AthleteIndex::empty())
        .precompute(&labels(&["Argentina", "Brazil"]), &labels(&["Barcelona", "PSG", "Chelsea"]))
        .await
        .unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(graph.calls(), 0);
}

#[tokio::test]
async fn test_generator_falls_back_when_nothing_validates() {
    let graph = Arc::new(StubGraph::silent());
    let generator = BoardGenerator::new(precomputer(graph, AthleteIndex::empty()));

    let board = generator.generate_with(&mut StdRng::seed_from_u64(1), 3).await;
    assert!(board.is_fallback());
    assert!(board.is_valid);
    assert!(board.empty_cells.is_empty());
}

#[tokio::test]
async fn test_generated_boards_are_valid_and_never_use_country_columns() {
    let graph = Arc::new(StubGraph::answering());
    let generator = BoardGenerator::new(precomputer(graph, decorated_index()));
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..20 {
        let board = generator.generate_with(&mut rng, 10).await;
        assert!(!board.is_fallback());
        assert!(board.is_valid);
        assert!(board.empty_cells.is_empty());
        assert_eq!(board.row_labels.len(), 3);
        assert!(board
            .col_labels
            .iter()
            .all(|c| !COUNTRIES.contains(&c.as_str())));
        assert!(board
            .row_labels
            .iter()
            .any(|r| COUNTRIES.contains(&r.as_str())));
    }
}
