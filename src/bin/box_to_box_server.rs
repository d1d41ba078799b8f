//! Box to Box REST API Server
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (reads .env if present)
//! PORT=5000 cargo run --bin box_to_box_server
//!
//! # Test endpoints
//! curl http://localhost:5000/api/health
//! curl "http://localhost:5000/api/resolve-entity?label=Barcelona&type=club"
//! curl http://localhost:5000/api/generate-board
//! curl -X POST http://localhost:5000/api/precompute-board \
//!   -H "Content-Type: application/json" \
//!   -d '{"rowLabels": ["Argentina", "Brazil", "Spain"],
//!        "colLabels": ["Barcelona", "Real Madrid", "Ballon d'\''Or Winner"]}'
//! ```

use std::sync::Arc;

use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use box_to_box::api::{create_router, AppState};
use box_to_box::config::AppConfig;
use box_to_box::local_index::LocalAchievementIndex;
use box_to_box::wikidata::WikidataClient;

const DEFAULT_LOG_FILTER: &str = "box_to_box=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    info!("Starting Box-to-Box API with {:?}", config);

    let graph = Arc::new(WikidataClient::new(&config)?);

    // Load the achievement index off the async workers before serving
    let index = Arc::new(LocalAchievementIndex::from_config(&config));
    let warm = index.clone();
    let athletes = tokio::task::spawn_blocking(move || warm.load_once().len())
        .await
        .context("Local achievement index load panicked")?;
    info!("Local achievement index ready ({} athletes)", athletes);

    let state = AppState::new(graph, index, config.board_max_attempts);

    let app = create_router(state).layer(
        ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        ),
    );

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
