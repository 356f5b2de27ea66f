//! Activity store configuration.

use serde::{Deserialize, Serialize};

/// Activity store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Days an untouched record is kept before the store drops it.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Page size used when draining status listings.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Redis connection settings.
    #[serde(default)]
    pub redis: RedisStoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            retention_days: default_retention_days(),
            page_size: default_page_size(),
            redis: RedisStoreConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Retention window expressed in seconds.
    pub fn retention_seconds(&self) -> u64 {
        u64::from(self.retention_days) * 24 * 60 * 60
    }
}

/// Redis-specific store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisStoreConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix prepended to every key the store writes.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_retention_days() -> u32 {
    30
}

fn default_page_size() -> usize {
    100
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_key_prefix() -> String {
    "activity:".to_string()
}
