//! Directory service client configuration.

use serde::{Deserialize, Serialize};

/// Largest batch the directory accepts for a multi-user lookup.
pub const MAX_BATCH_SIZE: usize = 500;

/// Directory service client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Region domain, e.g. `mypurecloud.com`.
    pub api_domain: String,
    /// Override for the API base URL (defaults to `https://api.{api_domain}`).
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Override for the login base URL (defaults to `https://login.{api_domain}`).
    #[serde(default)]
    pub login_base_url: Option<String>,
    /// OAuth client id for the client-credentials grant.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret for the client-credentials grant.
    #[serde(default)]
    pub client_secret: String,
    /// Timeout for directory API calls in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Timeout for token acquisition in seconds.
    #[serde(default = "default_token_timeout")]
    pub token_timeout_seconds: u64,
    /// Refresh the token this many seconds before it expires.
    #[serde(default = "default_refresh_margin")]
    pub token_refresh_margin_seconds: u64,
    /// Users per multi-user lookup request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl DirectoryConfig {
    /// Resolved API base URL without a trailing slash.
    pub fn api_base(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| format!("https://api.{}", self.api_domain))
            .trim_end_matches('/')
            .to_string()
    }

    /// Resolved login base URL without a trailing slash.
    pub fn login_base(&self) -> String {
        self.login_base_url
            .clone()
            .unwrap_or_else(|| format!("https://login.{}", self.api_domain))
            .trim_end_matches('/')
            .to_string()
    }
}

fn default_request_timeout() -> u64 {
    16
}

fn default_token_timeout() -> u64 {
    30
}

fn default_refresh_margin() -> u64 {
    60
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api: Option<&str>) -> DirectoryConfig {
        DirectoryConfig {
            api_domain: "mypurecloud.de".to_string(),
            api_base_url: api.map(str::to_string),
            login_base_url: None,
            client_id: String::new(),
            client_secret: String::new(),
            request_timeout_seconds: 16,
            token_timeout_seconds: 30,
            token_refresh_margin_seconds: 60,
            batch_size: 500,
        }
    }

    #[test]
    fn test_bases_derive_from_domain() {
        let cfg = config(None);
        assert_eq!(cfg.api_base(), "https://api.mypurecloud.de");
        assert_eq!(cfg.login_base(), "https://login.mypurecloud.de");
    }

    #[test]
    fn test_override_trims_slash() {
        let cfg = config(Some("http://127.0.0.1:9000/"));
        assert_eq!(cfg.api_base(), "http://127.0.0.1:9000");
    }
}
