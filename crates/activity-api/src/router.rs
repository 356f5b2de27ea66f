//! Route definitions for the activity monitor HTTP API.
//!
//! All routes are mounted under `/api`.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Event envelopes are small; anything larger is rejected before parsing.
const MAX_EVENT_BODY_BYTES: usize = 256 * 1024;

/// Build the Axum router with all routes and the per-request middleware.
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(event_routes())
        .merge(report_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_EVENT_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Inbound notification envelopes
fn event_routes() -> Router<AppState> {
    Router::new().route("/events", post(handlers::events::ingest_event))
}

/// Dashboard data
fn report_routes() -> Router<AppState> {
    Router::new().route("/report/data", get(handlers::report::report_data))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
