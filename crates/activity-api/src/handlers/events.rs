//! Event ingestion handler.

use axum::Json;
use axum::extract::State;
use tracing::info;

use activity_entity::event::InboundEvent;

use crate::dto::response::{ApiResponse, EventAcceptedResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/events
///
/// Accepts one event envelope. The body is taken as raw text so that a
/// malformed envelope surfaces as a validation error rather than an
/// extractor rejection.
pub async fn ingest_event(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiResponse<EventAcceptedResponse>>, ApiError> {
    let event = InboundEvent::from_json(&body)?;
    info!(user_id = %event.user_id, event = event.kind_name(), "Received event");

    let updated = state.reconciler.handle(&event).await?;
    Ok(Json(ApiResponse::ok(EventAcceptedResponse::new(
        event.kind_name(),
        &updated,
    ))))
}
