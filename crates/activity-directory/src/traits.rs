//! Directory service abstraction.

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;

use activity_core::result::AppResult;
use activity_entity::directory::{DirectoryUser, PresenceDefinition};

/// Operations the monitor needs from the directory service.
#[async_trait]
pub trait DirectoryService: Send + Sync + Debug {
    /// Fetch one user with groups, presence and conversation summary expanded.
    async fn get_user(&self, user_id: &str) -> AppResult<DirectoryUser>;

    /// Fetch many users, chunked to the directory's batch limit.
    ///
    /// Users the directory does not return are absent from the map.
    async fn get_users_batch(&self, user_ids: &[String]) -> AppResult<HashMap<String, DirectoryUser>>;

    /// Fetch all presence definitions keyed by id.
    async fn get_presence_definitions(&self) -> AppResult<HashMap<String, PresenceDefinition>>;

    /// Revoke every token of a user, forcing them out.
    async fn force_logout(&self, user_id: &str) -> AppResult<()>;

    /// Acquire a fresh access credential unconditionally.
    async fn reauthenticate(&self) -> AppResult<()>;

    /// Resolve the organization a caller's bearer token belongs to.
    async fn token_organization(&self, bearer: &str) -> AppResult<String>;
}
