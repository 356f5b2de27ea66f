//! HTTP implementation of the directory service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use activity_core::config::DirectoryConfig;
use activity_core::error::{AppError, ErrorKind};
use activity_core::result::AppResult;
use activity_entity::directory::{DirectoryUser, EntityPage, PresenceDefinition};

use crate::credentials::{CredentialManager, truncate};
use crate::traits::DirectoryService;

/// Expansions requested for a single-user lookup.
const USER_EXPAND: &str = "groups,presence,conversationSummary";

/// Directory REST client.
///
/// Every call carries the request timeout; a call that exceeds it is a
/// [`ErrorKind::Timeout`] failure and is not retried.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    api_base: Url,
    batch_size: usize,
    credentials: Arc<CredentialManager>,
}

impl DirectoryClient {
    /// Build a client sharing the given credential manager.
    pub fn new(config: &DirectoryConfig, credentials: Arc<CredentialManager>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build directory HTTP client", e)
            })?;

        let api_base = Url::parse(&config.api_base()).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid directory API base URL '{}'", config.api_base()),
                e,
            )
        })?;

        Ok(Self {
            http,
            api_base,
            batch_size: config.batch_size.max(1),
            credentials,
        })
    }

    /// The credential manager used for outbound calls.
    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::configuration("Directory API base URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, bearer: &str) -> AppResult<reqwest::Response> {
        debug!(method = %method, path = url.path(), "Directory request");
        let response = self
            .http
            .request(method, url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(map_transport_err)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = format!(
            "Directory request failed with status {}: {}",
            status.as_u16(),
            truncate(&body)
        );
        let kind = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Authentication,
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            _ => ErrorKind::Directory,
        };
        Err(AppError::new(kind, message))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        let bearer = self.credentials.bearer().await?;
        let response = self.send(Method::GET, url, &bearer).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(ErrorKind::Directory, "Failed to parse directory response", e)
        })
    }
}

fn map_transport_err(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::with_source(ErrorKind::Timeout, "Directory request timed out", e)
    } else {
        AppError::with_source(ErrorKind::Directory, format!("Directory request failed: {e}"), e)
    }
}

#[async_trait]
impl DirectoryService for DirectoryClient {
    async fn get_user(&self, user_id: &str) -> AppResult<DirectoryUser> {
        let mut url = self.endpoint(&["api", "v2", "users", user_id])?;
        url.query_pairs_mut().append_pair("expand", USER_EXPAND);
        self.get_json(url).await
    }

    async fn get_users_batch(&self, user_ids: &[String]) -> AppResult<HashMap<String, DirectoryUser>> {
        let mut users = HashMap::with_capacity(user_ids.len());
        for (n, chunk) in user_ids.chunks(self.batch_size).enumerate() {
            let mut url = self.endpoint(&["api", "v2", "users"])?;
            url.query_pairs_mut()
                .append_pair("id", &chunk.join(","))
                .append_pair("pageSize", &self.batch_size.to_string());

            let page: EntityPage<DirectoryUser> = self.get_json(url).await.map_err(|e| {
                let first = n * self.batch_size + 1;
                let last = first + chunk.len() - 1;
                AppError::new(
                    e.kind,
                    format!("Failed to fetch users {first}-{last}: {}", e.message),
                )
            })?;
            users.extend(page.entities.into_iter().map(|u| (u.id.clone(), u)));
        }
        debug!(requested = user_ids.len(), returned = users.len(), "Fetched user batch");
        Ok(users)
    }

    async fn get_presence_definitions(&self) -> AppResult<HashMap<String, PresenceDefinition>> {
        let url = self.endpoint(&["api", "v2", "presence", "definitions"])?;
        let page: EntityPage<PresenceDefinition> = self.get_json(url).await?;
        Ok(page
            .entities
            .into_iter()
            .map(|definition| (definition.id.clone(), definition))
            .collect())
    }

    async fn force_logout(&self, user_id: &str) -> AppResult<()> {
        let url = self.endpoint(&["api", "v2", "tokens", user_id])?;
        let bearer = self.credentials.bearer().await?;
        self.send(Method::DELETE, url, &bearer).await?;
        info!(user_id = %user_id, "Revoked directory tokens for user");
        Ok(())
    }

    async fn reauthenticate(&self) -> AppResult<()> {
        self.credentials.reauthenticate().await
    }

    async fn token_organization(&self, bearer: &str) -> AppResult<String> {
        let mut url = self.endpoint(&["api", "v2", "users", "me"])?;
        url.query_pairs_mut().append_pair("expand", "organization");
        let response = self.send(Method::GET, url, bearer).await?;
        let me: DirectoryUser = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Directory, "Failed to parse token owner", e)
        })?;
        me.organization
            .map(|org| org.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::authentication("Token owner has no organization"))
    }
}
