//! # activity-api
//!
//! HTTP surface of the activity monitor built on Axum.
//!
//! Provides event ingestion, the report data endpoint and a health check,
//! plus the middleware stack (CORS, request logging, timeouts) and the
//! mapping from [`AppError`](activity_core::error::AppError) to responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
