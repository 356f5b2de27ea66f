//! Activity store abstraction.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use activity_core::result::AppResult;
use activity_entity::activity::{ActivityState, ListStatus};

/// One listing request against the status index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Which bucket to list.
    pub status: ListStatus,
    /// Only records whose sort key is strictly before this instant.
    pub before: Option<DateTime<Utc>>,
    /// Opaque continuation token from a previous page.
    pub cursor: Option<String>,
    /// Maximum records per page.
    pub limit: usize,
}

impl ListQuery {
    /// First page of a status listing.
    pub fn new(status: ListStatus, limit: usize) -> Self {
        Self {
            status,
            before: None,
            cursor: None,
            limit,
        }
    }

    /// Restrict to deadlines strictly before `before`.
    pub fn before(mut self, before: DateTime<Utc>) -> Self {
        self.before = Some(before);
        self
    }

    /// Continue from a cursor.
    pub fn after(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// A page of listed records in ascending deadline order.
#[derive(Debug, Clone, Default)]
pub struct ActivityPage {
    pub items: Vec<ActivityState>,
    /// `None` when the listing is exhausted.
    pub next_cursor: Option<String>,
}

/// Keyed storage for activity records with a status listing index.
///
/// `put` derives the listing status and sort key from the record itself;
/// the index is never edited independently.
#[async_trait]
pub trait ActivityStore: Send + Sync + Debug {
    /// Read a record by user id.
    async fn get(&self, user_id: &str) -> AppResult<Option<ActivityState>>;

    /// Write a record, replacing any previous version and re-indexing it.
    async fn put(&self, state: &ActivityState) -> AppResult<()>;

    /// Read one page of the listing index.
    async fn list(&self, query: &ListQuery) -> AppResult<ActivityPage>;

    /// Check backend connectivity.
    async fn health_check(&self) -> AppResult<bool>;

    /// Page through a listing until exhausted.
    async fn list_all(
        &self,
        status: ListStatus,
        before: Option<DateTime<Utc>>,
        page_size: usize,
    ) -> AppResult<Vec<ActivityState>> {
        let mut items = Vec::new();
        let mut query = ListQuery {
            status,
            before,
            cursor: None,
            limit: page_size.max(1),
        };
        loop {
            let page = self.list(&query).await?;
            items.extend(page.items);
            match page.next_cursor {
                Some(cursor) => query.cursor = Some(cursor),
                None => break,
            }
        }
        Ok(items)
    }
}
