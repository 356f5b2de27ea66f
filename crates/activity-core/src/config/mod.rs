//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod directory;
pub mod logging;
pub mod reaper;
pub mod report;
pub mod store;
pub mod timeout;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::directory::DirectoryConfig;
pub use self::logging::LoggingConfig;
pub use self::reaper::{LogoutFailurePolicy, ReaperConfig, ReconcilerConfig};
pub use self::report::ReportConfig;
pub use self::store::StoreConfig;
pub use self::timeout::{MAX_TIMEOUT_MINUTES, TimeoutGroupConfig};

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "ACTIVITY";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay + env vars).
/// It is built once at process start and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Activity store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Directory service client settings.
    pub directory: DirectoryConfig,
    /// Reaper sweep settings.
    #[serde(default)]
    pub reaper: ReaperConfig,
    /// Event reconciler settings.
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    /// Reporting surface settings.
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Timeout groups, in priority-independent configuration order.
    #[serde(default)]
    pub timeout_groups: Vec<TimeoutGroupConfig>,
}

impl AppConfig {
    /// Load configuration for the given environment.
    ///
    /// Merges `config/default`, the `config/{env}` overlay, and environment
    /// variables prefixed with `ACTIVITY_` (using `__` as the section separator).
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration from an explicit base file plus the environment overlay.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let base = base.trim_end_matches(".toml");
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        let parsed: Self = config.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for group in &self.timeout_groups {
            if group.id.trim().is_empty() {
                return Err(AppError::configuration("Timeout group with empty id"));
            }
            if !(1..=MAX_TIMEOUT_MINUTES).contains(&group.timeout_minutes) {
                return Err(AppError::configuration(format!(
                    "Timeout group '{}' must have timeout_minutes between 1 and {}",
                    group.id, MAX_TIMEOUT_MINUTES
                )));
            }
            if !seen.insert(group.id.as_str()) {
                return Err(AppError::configuration(format!(
                    "Duplicate timeout group id '{}'",
                    group.id
                )));
            }
        }

        if self.reaper.concurrency == 0 {
            return Err(AppError::configuration("reaper.concurrency must be at least 1"));
        }

        if !(1..=directory::MAX_BATCH_SIZE).contains(&self.directory.batch_size) {
            return Err(AppError::configuration(format!(
                "directory.batch_size must be between 1 and {}",
                directory::MAX_BATCH_SIZE
            )));
        }

        if self.store.page_size == 0 {
            return Err(AppError::configuration("store.page_size must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [directory]
        api_domain = "mypurecloud.com"
        client_id = "id"
        client_secret = "secret"

        [[timeout_groups]]
        id = "e613e69c-a2d4-40fc-aba5-a9a5eb43eeef"
        name = "Timeout Group - agents"
        timeout_minutes = 15

        [[timeout_groups]]
        id = "f42fd8d0-3c9b-4db4-b389-c845fcef92c9"
        name = "Timeout Group - supervisors"
        timeout_minutes = 60
    "#;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config = AppConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.store.provider, "memory");
        assert_eq!(config.directory.batch_size, 500);
        assert_eq!(config.directory.request_timeout_seconds, 16);
        assert_eq!(config.reaper.on_logout_failure, LogoutFailurePolicy::ClearDeadline);
        assert!(config.reconciler.refresh_expired_on_load);
        assert_eq!(config.timeout_groups.len(), 2);
        assert_eq!(config.timeout_groups[1].timeout_minutes, 60);
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let doc = format!(
            "{MINIMAL}\n[[timeout_groups]]\nid = \"e613e69c-a2d4-40fc-aba5-a9a5eb43eeef\"\nname = \"dup\"\ntimeout_minutes = 5\n"
        );
        let err = AppConfig::from_toml_str(&doc).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_non_positive_timeout_rejected() {
        let doc = r#"
            [directory]
            api_domain = "example.com"

            [[timeout_groups]]
            id = "g1"
            name = "zero"
            timeout_minutes = 0
        "#;
        assert!(AppConfig::from_toml_str(doc).is_err());
    }

    #[test]
    fn test_oversized_timeout_rejected() {
        let doc = r#"
            [directory]
            api_domain = "example.com"

            [[timeout_groups]]
            id = "g1"
            name = "forever"
            timeout_minutes = 1000000000000000
        "#;
        let err = AppConfig::from_toml_str(doc).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);

        let at_cap = format!(
            "[directory]\napi_domain = \"example.com\"\n\n[[timeout_groups]]\nid = \"g1\"\ntimeout_minutes = {MAX_TIMEOUT_MINUTES}\n"
        );
        assert!(AppConfig::from_toml_str(&at_cap).is_ok());
    }

    #[test]
    fn test_retry_policy_parses() {
        let doc = format!("{MINIMAL}\n[reaper]\non_logout_failure = \"retry_next_cycle\"\n");
        let config = AppConfig::from_toml_str(&doc).unwrap();
        assert_eq!(
            config.reaper.on_logout_failure,
            LogoutFailurePolicy::RetryNextCycle
        );
    }
}
