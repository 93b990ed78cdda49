//! Router configuration.

use axum::{routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::handlers::{health_handler, info_handler, updates_handler};
use crate::state::AppState;

/// Builds the application router with request tracing.
///
/// # Routes
///
/// - `GET /v1/mangas` - latest updates / search
/// - `GET /v1/mangas/{manga}` - title details
/// - `GET /health` - liveness
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/mangas", get(updates_handler))
        .route("/v1/mangas/{manga}", get(info_handler))
        .route("/health", get(health_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(state)
}
