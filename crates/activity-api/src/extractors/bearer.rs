//! `ReportAccess` extractor that validates the report bearer token.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Proof that the caller presented a bearer token of the expected organization.
#[derive(Debug, Clone, Copy)]
pub struct ReportAccess;

impl FromRequestParts<AppState> for ReportAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A non-ASCII header is treated as missing.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        state.report.authorize(header).await?;
        Ok(ReportAccess)
    }
}
