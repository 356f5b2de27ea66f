//! Access credential for outbound directory calls.
//!
//! The token is acquired with the OAuth client-credentials grant and held
//! with its expiry. Callers ask for a bearer on every request; a new token
//! is fetched only when the cached one is within the refresh margin of
//! expiring, or when [`CredentialManager::reauthenticate`] forces it.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use activity_core::config::DirectoryConfig;
use activity_core::error::{AppError, ErrorKind};
use activity_core::result::AppResult;

/// Lifetime assumed when the token response omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 24 * 60 * 60;

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Owns the directory access token and its expiry.
pub struct CredentialManager {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_margin: TimeDelta,
    token: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl CredentialManager {
    /// Build a manager from the directory configuration. No request is made.
    pub fn new(config: &DirectoryConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.token_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build token HTTP client", e)
            })?;

        Ok(Self {
            http,
            token_url: format!("{}/oauth/token", config.login_base()),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_margin: i64::try_from(config.token_refresh_margin_seconds)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .unwrap_or(TimeDelta::MAX),
            token: Mutex::new(None),
        })
    }

    /// A bearer token valid beyond the refresh margin, fetching one if needed.
    pub async fn bearer(&self) -> AppResult<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            // An expiry too close to the epoch to subtract the margin is stale.
            let refresh_at = token.expires_at.checked_sub_signed(self.refresh_margin);
            if refresh_at.is_some_and(|at| at > Utc::now()) {
                return Ok(token.value.clone());
            }
            debug!("Directory access token near expiry, refreshing");
        }
        let token = self.acquire().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// Replace the cached token with a freshly acquired one.
    pub async fn reauthenticate(&self) -> AppResult<()> {
        let mut guard = self.token.lock().await;
        let token = self.acquire().await?;
        info!(expires_at = %token.expires_at, "Directory access token acquired");
        *guard = Some(token);
        Ok(())
    }

    /// Expiry of the cached token, if any.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.lock().await.as_ref().map(|t| t.expires_at)
    }

    async fn acquire(&self) -> AppResult<AccessToken> {
        let requested_at = Utc::now();
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    ErrorKind::Timeout
                } else {
                    ErrorKind::Authentication
                };
                AppError::with_source(kind, "Token request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::authentication(format!(
                "Token request failed with status {}: {}",
                status.as_u16(),
                truncate(&body)
            )));
        }

        let parsed: TokenResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Authentication, "Failed to parse token response", e)
        })?;
        if parsed.access_token.is_empty() {
            return Err(AppError::authentication("No access token received"));
        }

        Ok(AccessToken {
            value: parsed.access_token,
            expires_at: token_expiry(requested_at, parsed.expires_in),
        })
    }
}

/// Expiry for a token issued at `requested_at`. A missing lifetime, or one
/// that does not fit a timestamp, falls back to the default lifetime.
fn token_expiry(requested_at: DateTime<Utc>, expires_in: Option<i64>) -> DateTime<Utc> {
    let fallback = || requested_at + TimeDelta::seconds(DEFAULT_TOKEN_LIFETIME_SECONDS);
    let Some(lifetime) = expires_in else {
        return fallback();
    };
    match TimeDelta::try_seconds(lifetime).and_then(|d| requested_at.checked_add_signed(d)) {
        Some(at) => at,
        None => {
            warn!(expires_in = lifetime, "Token lifetime out of range, using default");
            fallback()
        }
    }
}

/// Shorten a response body for error messages.
pub(crate) fn truncate(body: &str) -> &str {
    const MAX: usize = 256;
    if body.len() <= MAX {
        return body;
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
