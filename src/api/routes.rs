//! Game API endpoints
//!
//! ## Endpoints
//!
//! - `GET  /api/health` - Liveness probe
//! - `GET  /api/resolve-entity` - Label to ranked entities
//! - `GET  /api/player-by-name` - Player candidates ranked by name similarity
//! - `GET  /api/check-player` - OR rule for one submitted athlete
//! - `GET  /api/player-details` - Citizenships and club spells
//! - `POST /api/precompute-board` - Every valid answer for a 3x3 board
//! - `GET  /api/autocomplete` - Football-related search suggestions
//! - `GET  /api/generate-board` - Random validated board
//! - `GET  /api/local-search` - Name search over the local index
//! - `GET  /api/database-stats` - Local index statistics

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ApiError;
use super::AppState;
use crate::board::{check_labels, BoardPrecomputation, GeneratedBoard};
use crate::entity::{Entity, ResolveType};
use crate::graph::{AthleteCandidate, AthleteDetails, SearchHit};
use crate::local_index::{IndexStats, LocalSearchHit};
use crate::lookup::DEFAULT_AUTOCOMPLETE_LIMIT;
use crate::matching::MatchResult;

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ResolveEntityQuery {
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPlayerQuery {
    pub player_q: Option<String>,
    /// Display name, used to find curated athletes for achievement axes
    pub player_name: Option<String>,
    pub row_label: Option<String>,
    pub col_label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuery {
    pub player_q: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecomputeRequest {
    pub row_labels: Option<Vec<String>>,
    pub col_labels: Option<Vec<String>>,
    /// Client session; a newer precompute for the same session supersedes this one
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    /// Kept as text so a malformed value falls back to the default
    pub limit: Option<String>,
}

/// Non-blank parameter or a 400
fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing(name))
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Box-to-Box API is running",
    })
}

/// GET /api/resolve-entity?label=Barcelona&type=club
async fn resolve_entity(
    State(state): State<AppState>,
    Query(query): Query<ResolveEntityQuery>,
) -> ApiResult<Vec<Entity>> {
    let label = required(query.label, "label")?;
    let kind: ResolveType = query
        .kind
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e| ApiError::from_board("Invalid request", e))?;

    let entities = state
        .resolver
        .resolve(&label, kind)
        .await
        .map_err(|e| ApiError::from_board("Failed to resolve entity", e))?;
    Ok(Json(entities))
}

/// GET /api/player-by-name?name=Messi
async fn player_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Vec<AthleteCandidate>> {
    let name = required(query.name, "name")?;
    let players = state
        .lookup
        .find_by_name(&name)
        .await
        .map_err(|e| ApiError::from_board("Failed to find player", e))?;
    Ok(Json(players))
}

/// GET /api/check-player?playerQ=Q615&rowLabel=Argentina&colLabel=Barcelona
///
/// `playerName` is optional.
async fn check_player(
    State(state): State<AppState>,
    Query(query): Query<CheckPlayerQuery>,
) -> ApiResult<MatchResult> {
    let player = required(query.player_q, "playerQ")?;
    let row = required(query.row_label, "rowLabel")?;
    let col = required(query.col_label, "colLabel")?;
    let name = query
        .player_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let result = state
        .matcher
        .check_athlete_against_labels(&player, name.as_deref(), &row, &col)
        .await
        .map_err(|e| ApiError::from_board("Failed to check player", e))?;
    Ok(Json(result))
}

/// GET /api/player-details?playerQ=Q615
async fn player_details(
    State(state): State<AppState>,
    Query(query): Query<PlayerQuery>,
) -> ApiResult<AthleteDetails> {
    let player = required(query.player_q, "playerQ")?;
    let details = state
        .lookup
        .details(&player)
        .await
        .map_err(|e| ApiError::from_board("Failed to get player details", e))?;
    Ok(Json(details))
}

/// POST /api/precompute-board
///
/// Body: `{"rowLabels": [..3], "colLabels": [..3], "sessionId": "optional"}`
async fn precompute_board(
    State(state): State<AppState>,
    body: Result<Json<PrecomputeRequest>, JsonRejection>,
) -> ApiResult<BoardPrecomputation> {
    let Json(request) = body.map_err(|e| {
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid request", e.body_text())
    })?;
    let rows = request.row_labels.ok_or_else(|| ApiError::missing("rowLabels"))?;
    let cols = request.col_labels.ok_or_else(|| ApiError::missing("colLabels"))?;
    check_labels(&rows, &cols).map_err(|e| ApiError::from_board("Invalid request", e))?;

    let token = match request.session_id.as_deref().map(str::trim) {
        Some(session) if !session.is_empty() => Some(state.sequencer.begin(session).await),
        _ => None,
    };

    let board = state
        .precomputer
        .precompute(&rows, &cols)
        .await
        .map_err(|e| ApiError::from_board("Failed to precompute board", e));

    if let Some(token) = token {
        let current = state.sequencer.is_current(&token).await;
        state.sequencer.finish(&token).await;
        if !current {
            info!(
                "Dropping superseded precompute {} for session {}",
                token.generation(),
                token.session()
            );
            return Err(ApiError::superseded(token.session()));
        }
    }
    Ok(Json(board?))
}

/// GET /api/autocomplete?query=mes&limit=10
///
/// Short queries and upstream failures both yield an empty list.
async fn autocomplete(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<SearchHit>> {
    let limit = query
        .limit
        .and_then(|l| l.trim().parse::<usize>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_AUTOCOMPLETE_LIMIT);
    let text = query.query.unwrap_or_default();

    Json(state.lookup.autocomplete(&text, limit).await)
}

async fn generate_board(State(state): State<AppState>) -> Json<GeneratedBoard> {
    Json(state.generator.generate(state.max_attempts).await)
}

/// GET /api/local-search?query=modric
async fn local_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<LocalSearchHit>> {
    let text = required(query.query, "query")?;
    Ok(Json(state.index.search_by_name(&text)))
}

async fn database_stats(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.index.stats())
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/resolve-entity", get(resolve_entity))
        .route("/api/player-by-name", get(player_by_name))
        .route("/api/check-player", get(check_player))
        .route("/api/player-details", get(player_details))
        .route("/api/precompute-board", post(precompute_board))
        .route("/api/autocomplete", get(autocomplete))
        .route("/api/generate-board", get(generate_board))
        .route("/api/local-search", get(local_search))
        .route("/api/database-stats", get(database_stats))
        .with_state(state)
}
