//! Derived listing status of an activity record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Listing bucket derived from the inactivity deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    /// A deadline is set; the user may be reaped.
    Pending,
    /// No deadline; the user is not eligible for reaping.
    Exempt,
}

impl ListStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Exempt => "exempt",
        }
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ListStatus {
    type Err = activity_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "exempt" => Ok(Self::Exempt),
            _ => Err(activity_core::AppError::validation(format!(
                "Invalid list status: '{s}'"
            ))),
        }
    }
}
