//! In-memory activity store backed by a map and two ordered index sets.

use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use activity_core::error::AppError;
use activity_core::result::AppResult;
use activity_entity::activity::{ActivityState, ListStatus};

use crate::traits::{ActivityPage, ActivityStore, ListQuery};

/// Index entry: deadline sort key, then user id for a stable order.
type IndexEntry = (i64, String);

#[derive(Debug)]
struct StoredRecord {
    state: ActivityState,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, StoredRecord>,
    pending: BTreeSet<IndexEntry>,
    exempt: BTreeSet<IndexEntry>,
}

impl Inner {
    fn index_mut(&mut self, status: ListStatus) -> &mut BTreeSet<IndexEntry> {
        match status {
            ListStatus::Pending => &mut self.pending,
            ListStatus::Exempt => &mut self.exempt,
        }
    }

    fn index(&self, status: ListStatus) -> &BTreeSet<IndexEntry> {
        match status {
            ListStatus::Pending => &self.pending,
            ListStatus::Exempt => &self.exempt,
        }
    }

    fn unindex(&mut self, state: &ActivityState) {
        let entry = (state.list_sort_key(), state.user_id.clone());
        self.index_mut(state.list_status()).remove(&entry);
    }

    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .records
            .iter()
            .filter(|(_, record)| record.expires_at <= now)
            .map(|(id, _)| id.clone())
            .collect();
        for user_id in expired {
            if let Some(record) = self.records.remove(&user_id) {
                self.unindex(&record.state);
            }
        }
    }
}

/// In-process activity store.
///
/// Records expire after the retention window measured from their last
/// write. Cursors are the last returned index entry, so pages stay stable
/// when earlier entries are removed between calls.
#[derive(Debug, Clone)]
pub struct MemoryActivityStore {
    inner: Arc<RwLock<Inner>>,
    retention: Duration,
}

impl MemoryActivityStore {
    /// Create an empty store with the given record retention.
    pub fn new(retention: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            retention,
        }
    }

    /// Number of live records.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.inner
            .read()
            .await
            .records
            .values()
            .filter(|record| record.expires_at > now)
            .count()
    }

    /// Whether the store holds no live records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryActivityStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(30 * 24 * 60 * 60))
    }
}

fn encode_cursor(entry: &IndexEntry) -> String {
    format!("{}:{}", entry.0, entry.1)
}

fn decode_cursor(cursor: &str) -> AppResult<IndexEntry> {
    let (key, user_id) = cursor
        .split_once(':')
        .ok_or_else(|| AppError::validation(format!("Invalid cursor: '{cursor}'")))?;
    let key = key
        .parse::<i64>()
        .map_err(|_| AppError::validation(format!("Invalid cursor: '{cursor}'")))?;
    Ok((key, user_id.to_string()))
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn get(&self, user_id: &str) -> AppResult<Option<ActivityState>> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .get(user_id)
            .filter(|record| record.expires_at > Instant::now())
            .map(|record| record.state.clone()))
    }

    async fn put(&self, state: &ActivityState) -> AppResult<()> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        inner.purge_expired(now);

        if let Some(previous) = inner.records.remove(&state.user_id) {
            inner.unindex(&previous.state);
        }

        let entry = (state.list_sort_key(), state.user_id.clone());
        inner.index_mut(state.list_status()).insert(entry);
        inner.records.insert(
            state.user_id.clone(),
            StoredRecord {
                state: state.clone(),
                expires_at: now + self.retention,
            },
        );

        debug!(
            user_id = %state.user_id,
            status = %state.list_status(),
            sort_key = state.list_sort_key(),
            "Stored activity record"
        );
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> AppResult<ActivityPage> {
        let lower = match &query.cursor {
            Some(cursor) => Bound::Excluded(decode_cursor(cursor)?),
            None => Bound::Unbounded,
        };
        let before = query.before.map(|b| b.timestamp_millis());
        let limit = query.limit.max(1);
        let now = Instant::now();

        let inner = self.inner.read().await;
        let mut items = Vec::with_capacity(limit);
        let mut last_entry = None;
        let mut has_more = false;

        for entry in inner
            .index(query.status)
            .range((lower, Bound::Unbounded))
            .take_while(|(key, _)| before.is_none_or(|b| *key < b))
        {
            let Some(record) = inner.records.get(&entry.1) else {
                continue;
            };
            if record.expires_at <= now {
                continue;
            }
            if items.len() == limit {
                has_more = true;
                break;
            }
            items.push(record.state.clone());
            last_entry = Some(entry);
        }

        let next_cursor = if has_more {
            last_entry.map(encode_cursor)
        } else {
            None
        };
        Ok(ActivityPage { items, next_cursor })
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn pending(user_id: &str, minutes: i64) -> ActivityState {
        let mut state = ActivityState::new(user_id, now());
        state.group_id = "g".into();
        state.inactivity_deadline = Some(now() + TimeDelta::minutes(minutes));
        state
    }

    fn exempt(user_id: &str) -> ActivityState {
        ActivityState::new(user_id, now())
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryActivityStore::default();
        assert!(store.get("u1").await.unwrap().is_none());

        store.put(&pending("u1", 5)).await.unwrap();
        let loaded = store.get("u1").await.unwrap().unwrap();
        assert_eq!(loaded, pending("u1", 5));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_moves_between_indexes() {
        let store = MemoryActivityStore::default();
        store.put(&pending("u1", 5)).await.unwrap();

        let pending_page = store.list(&ListQuery::new(ListStatus::Pending, 10)).await.unwrap();
        assert_eq!(pending_page.items.len(), 1);

        store.put(&exempt("u1")).await.unwrap();
        let pending_page = store.list(&ListQuery::new(ListStatus::Pending, 10)).await.unwrap();
        let exempt_page = store.list(&ListQuery::new(ListStatus::Exempt, 10)).await.unwrap();
        assert!(pending_page.items.is_empty());
        assert_eq!(exempt_page.items.len(), 1);
        assert!(exempt_page.items[0].inactivity_deadline.is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_deadline_and_filters_before() {
        let store = MemoryActivityStore::default();
        store.put(&pending("late", 30)).await.unwrap();
        store.put(&pending("early", -10)).await.unwrap();
        store.put(&pending("middle", 0)).await.unwrap();

        let all = store.list_all(ListStatus::Pending, None, 10).await.unwrap();
        let ids: Vec<_> = all.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(ids, vec!["early", "middle", "late"]);

        // Strictly before: a deadline equal to the bound is excluded.
        let due = store.list_all(ListStatus::Pending, Some(now()), 10).await.unwrap();
        let ids: Vec<_> = due.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(ids, vec!["early"]);
    }

    #[tokio::test]
    async fn test_pagination_drains_every_record() {
        let store = MemoryActivityStore::default();
        for i in 0..7 {
            store.put(&pending(&format!("u{i}"), i)).await.unwrap();
        }

        let first = store.list(&ListQuery::new(ListStatus::Pending, 3)).await.unwrap();
        assert_eq!(first.items.len(), 3);
        assert!(first.next_cursor.is_some());

        let all = store.list_all(ListStatus::Pending, None, 3).await.unwrap();
        assert_eq!(all.len(), 7);
    }

    #[tokio::test]
    async fn test_exact_page_has_no_cursor() {
        let store = MemoryActivityStore::default();
        store.put(&exempt("a")).await.unwrap();
        store.put(&exempt("b")).await.unwrap();

        let page = store.list(&ListQuery::new(ListStatus::Exempt, 2)).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_invalid_cursor_rejected() {
        let store = MemoryActivityStore::default();
        let query = ListQuery::new(ListStatus::Pending, 2).after(Some("garbage".into()));
        assert!(store.list(&query).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_records_expire_after_retention() {
        let store = MemoryActivityStore::new(Duration::from_secs(60));
        store.put(&pending("u1", 5)).await.unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(store.get("u1").await.unwrap().is_none());
        assert!(store.list_all(ListStatus::Pending, None, 10).await.unwrap().is_empty());
        assert!(store.is_empty().await);
    }
}
