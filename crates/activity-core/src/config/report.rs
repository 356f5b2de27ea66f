//! Reporting surface configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the joined activity report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Organization a caller's token must belong to.
    #[serde(default)]
    pub expected_organization_id: String,
    /// Locale key used to pick presence labels.
    #[serde(default = "default_locale")]
    pub presence_label_locale: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            expected_organization_id: String::new(),
            presence_label_locale: default_locale(),
        }
    }
}

fn default_locale() -> String {
    "en_US".to_string()
}
