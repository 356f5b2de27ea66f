//! Reaper sweep and reconciler configuration.

use serde::{Deserialize, Serialize};

/// What to do with a record whose forced logout failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogoutFailurePolicy {
    /// Clear the deadline anyway; the user will not be retried.
    #[default]
    ClearDeadline,
    /// Leave the record pending so the next sweep retries it.
    RetryNextCycle,
}

/// Periodic reaper sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaperConfig {
    /// Whether the server process schedules the sweep.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Six-field cron expression (seconds first).
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// Maximum concurrent forced logouts within one sweep.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Handling of records whose forced logout failed.
    #[serde(default)]
    pub on_logout_failure: LogoutFailurePolicy,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            schedule: default_schedule(),
            concurrency: default_concurrency(),
            on_logout_failure: LogoutFailurePolicy::default(),
        }
    }
}

/// Event reconciler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Re-fetch a stored record from the directory when its deadline already passed.
    #[serde(default = "default_enabled")]
    pub refresh_expired_on_load: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            refresh_expired_on_load: default_enabled(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_schedule() -> String {
    "0 * * * * *".to_string()
}

fn default_concurrency() -> usize {
    4
}
