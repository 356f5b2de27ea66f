//! Timeout group configuration.

use serde::{Deserialize, Serialize};

/// Upper bound for `timeout_minutes`: one year.
pub const MAX_TIMEOUT_MINUTES: i64 = 366 * 24 * 60;

/// One configured timeout group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutGroupConfig {
    /// Directory group id.
    pub id: String,
    /// Display name shown in reports.
    #[serde(default)]
    pub name: String,
    /// Inactivity timeout in minutes.
    pub timeout_minutes: i64,
}
