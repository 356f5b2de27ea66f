//! Scripted in-process directory used by tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use activity_core::error::AppError;
use activity_core::result::AppResult;
use activity_entity::directory::{DirectoryGroup, DirectoryUser, PresenceDefinition};
use activity_entity::presence::PresenceUpdate;

use crate::traits::DirectoryService;

#[derive(Debug, Default)]
struct MockState {
    users: HashMap<String, DirectoryUser>,
    presences: HashMap<String, PresenceDefinition>,
    organizations: HashMap<String, String>,
    failing_logouts: HashSet<String>,
    unreachable: bool,
    reauth_fails: bool,
    get_user_calls: Vec<String>,
    batch_calls: Vec<Vec<String>>,
    logout_calls: Vec<String>,
    reauth_calls: usize,
}

/// In-memory [`DirectoryService`] with scripted data and call recording.
#[derive(Debug, Default)]
pub struct MockDirectory {
    state: Mutex<MockState>,
}

impl MockDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    /// Add or replace a user snapshot.
    pub fn insert_user(&self, user: DirectoryUser) {
        self.with_state(|s| {
            s.users.insert(user.id.clone(), user);
        });
    }

    /// Add a user from its essentials.
    pub fn add_user(&self, id: &str, groups: &[&str], system_presence: &str) {
        self.insert_user(DirectoryUser {
            id: id.to_string(),
            name: format!("User {id}"),
            groups: groups
                .iter()
                .map(|g| DirectoryGroup {
                    id: g.to_string(),
                    self_uri: None,
                })
                .collect(),
            presence: PresenceUpdate::new(system_presence, format!("{system_presence}-def")),
            ..Default::default()
        });
    }

    /// Add a presence definition.
    pub fn insert_presence(&self, definition: PresenceDefinition) {
        self.with_state(|s| {
            s.presences.insert(definition.id.clone(), definition);
        });
    }

    /// Map a caller bearer token to an organization id.
    pub fn set_token_organization(&self, bearer: &str, organization_id: &str) {
        self.with_state(|s| {
            s.organizations
                .insert(bearer.to_string(), organization_id.to_string());
        });
    }

    /// Make `force_logout` fail for a user.
    pub fn fail_logout_for(&self, user_id: &str) {
        self.with_state(|s| {
            s.failing_logouts.insert(user_id.to_string());
        });
    }

    /// Make every read fail as if the directory were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.with_state(|s| s.unreachable = unreachable);
    }

    /// Make `reauthenticate` fail.
    pub fn set_reauth_fails(&self, fails: bool) {
        self.with_state(|s| s.reauth_fails = fails);
    }

    /// User ids passed to `get_user`, in call order.
    pub fn get_user_calls(&self) -> Vec<String> {
        self.with_state(|s| s.get_user_calls.clone())
    }

    /// Id lists passed to `get_users_batch`.
    pub fn batch_calls(&self) -> Vec<Vec<String>> {
        self.with_state(|s| s.batch_calls.clone())
    }

    /// User ids passed to `force_logout`, in call order.
    pub fn logout_calls(&self) -> Vec<String> {
        self.with_state(|s| s.logout_calls.clone())
    }

    /// Number of `reauthenticate` calls.
    pub fn reauth_calls(&self) -> usize {
        self.with_state(|s| s.reauth_calls)
    }
}

#[async_trait]
impl DirectoryService for MockDirectory {
    async fn get_user(&self, user_id: &str) -> AppResult<DirectoryUser> {
        self.with_state(|s| {
            s.get_user_calls.push(user_id.to_string());
            if s.unreachable {
                return Err(AppError::directory("directory unreachable"));
            }
            s.users
                .get(user_id)
                .cloned()
                .ok_or_else(|| AppError::not_found(format!("User '{user_id}' not found")))
        })
    }

    async fn get_users_batch(&self, user_ids: &[String]) -> AppResult<HashMap<String, DirectoryUser>> {
        self.with_state(|s| {
            s.batch_calls.push(user_ids.to_vec());
            if s.unreachable {
                return Err(AppError::directory("directory unreachable"));
            }
            Ok(user_ids
                .iter()
                .filter_map(|id| s.users.get(id).map(|u| (id.clone(), u.clone())))
                .collect())
        })
    }

    async fn get_presence_definitions(&self) -> AppResult<HashMap<String, PresenceDefinition>> {
        self.with_state(|s| {
            if s.unreachable {
                return Err(AppError::directory("directory unreachable"));
            }
            Ok(s.presences.clone())
        })
    }

    async fn force_logout(&self, user_id: &str) -> AppResult<()> {
        self.with_state(|s| {
            s.logout_calls.push(user_id.to_string());
            if s.unreachable || s.failing_logouts.contains(user_id) {
                return Err(AppError::directory(format!("logout failed for '{user_id}'")));
            }
            Ok(())
        })
    }

    async fn reauthenticate(&self) -> AppResult<()> {
        self.with_state(|s| {
            s.reauth_calls += 1;
            if s.reauth_fails {
                return Err(AppError::authentication("token request rejected"));
            }
            Ok(())
        })
    }

    async fn token_organization(&self, bearer: &str) -> AppResult<String> {
        self.with_state(|s| {
            if s.unreachable {
                return Err(AppError::directory("directory unreachable"));
            }
            s.organizations
                .get(bearer)
                .cloned()
                .ok_or_else(|| AppError::authentication("Unknown bearer token"))
        })
    }
}
