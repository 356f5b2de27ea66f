//! Store manager that dispatches to the configured backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use activity_core::config::StoreConfig;
use activity_core::error::AppError;
use activity_core::result::AppResult;
use activity_entity::activity::ActivityState;

use crate::traits::{ActivityPage, ActivityStore, ListQuery};

/// Store manager that wraps the configured activity store.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn ActivityStore>,
}

impl StoreManager {
    /// Create a store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let retention = Duration::from_secs(config.retention_seconds());
        let inner: Arc<dyn ActivityStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!(retention_days = config.retention_days, "Initializing Redis activity store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisActivityStore::new(client, retention))
            }
            "memory" => {
                info!(retention_days = config.retention_days, "Initializing in-memory activity store");
                Arc::new(crate::memory::MemoryActivityStore::new(retention))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn ActivityStore>) -> Self {
        Self { inner: store }
    }

    /// Get a reference to the inner store.
    pub fn store(&self) -> &dyn ActivityStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl ActivityStore for StoreManager {
    async fn get(&self, user_id: &str) -> AppResult<Option<ActivityState>> {
        self.inner.get(user_id).await
    }

    async fn put(&self, state: &ActivityState) -> AppResult<()> {
        self.inner.put(state).await
    }

    async fn list(&self, query: &ListQuery) -> AppResult<ActivityPage> {
        self.inner.list(query).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_selected() {
        let manager = StoreManager::new(&StoreConfig::default()).await.unwrap();
        assert!(manager.health_check().await.unwrap());
        assert!(manager.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = StoreConfig {
            provider: "dynamo".into(),
            ..StoreConfig::default()
        };
        let err = StoreManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, activity_core::error::ErrorKind::Configuration);
    }
}
