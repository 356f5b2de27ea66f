//! Report data handler.

use axum::Json;
use axum::extract::State;

use activity_service::ActivityReportEntry;

use crate::error::ApiError;
use crate::extractors::ReportAccess;
use crate::state::AppState;

/// GET /api/report/data
///
/// Returns the flat list the dashboard renders: pending entries followed
/// by exempt ones.
pub async fn report_data(
    State(state): State<AppState>,
    _access: ReportAccess,
) -> Result<Json<Vec<ActivityReportEntry>>, ApiError> {
    let entries = state.report.build_report().await?;
    Ok(Json(entries))
}
