//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use activity_entity::activity::{ActivityState, ListStatus};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Result of applying one inbound event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAcceptedResponse {
    pub user_id: String,
    /// `presence` or `conversationsummary`.
    pub event: String,
    pub status: ListStatus,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub inactivity_deadline: Option<DateTime<Utc>>,
}

impl EventAcceptedResponse {
    pub fn new(event: &str, state: &ActivityState) -> Self {
        Self {
            user_id: state.user_id.clone(),
            event: event.to_string(),
            status: state.list_status(),
            inactivity_deadline: state.inactivity_deadline,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answered, `degraded` otherwise.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
    /// `connected` or `unavailable`.
    pub store: String,
}
