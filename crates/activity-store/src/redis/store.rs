//! Redis-backed activity store.
//!
//! Records are JSON strings under `ua|<user>` with key expiry set to the
//! retention window. The listing index is two sorted sets, `ua|pending`
//! and `ua|exempt`, scored by the deadline in epoch milliseconds (0 when
//! exempt). A record and its index membership are written in one
//! MULTI/EXEC transaction.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};

use activity_core::error::{AppError, ErrorKind};
use activity_core::result::AppResult;
use activity_entity::activity::{ActivityState, ListStatus};

use super::client::RedisClient;
use crate::keys;
use crate::traits::{ActivityPage, ActivityStore, ListQuery};

/// Redis activity store.
#[derive(Debug, Clone)]
pub struct RedisActivityStore {
    client: RedisClient,
    retention: Duration,
}

impl RedisActivityStore {
    /// Create a store over a connected client.
    pub fn new(client: RedisClient, retention: Duration) -> Self {
        Self { client, retention }
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Store, format!("Redis error: {e}"), e)
    }

    fn record_key(&self, user_id: &str) -> String {
        self.client.prefixed_key(&keys::record(user_id))
    }

    fn index_key(&self, status: ListStatus) -> String {
        self.client.prefixed_key(&keys::index(status))
    }

    fn parse_offset(cursor: Option<&str>) -> AppResult<isize> {
        match cursor {
            None => Ok(0),
            Some(raw) => raw
                .parse::<isize>()
                .ok()
                .filter(|offset| *offset >= 0)
                .ok_or_else(|| AppError::validation(format!("Invalid cursor: '{raw}'"))),
        }
    }
}

#[async_trait]
impl ActivityStore for RedisActivityStore {
    async fn get(&self, user_id: &str) -> AppResult<Option<ActivityState>> {
        let mut conn = self.client.conn_mut();
        let raw: Option<String> = conn
            .get(self.record_key(user_id))
            .await
            .map_err(Self::map_err)?;
        raw.map(|json| serde_json::from_str(&json).map_err(AppError::from))
            .transpose()
    }

    async fn put(&self, state: &ActivityState) -> AppResult<()> {
        let status = state.list_status();
        let json = serde_json::to_string(state)?;
        let mut conn = self.client.conn_mut();

        let _: () = redis::pipe()
            .atomic()
            .set_ex(
                self.record_key(&state.user_id),
                json,
                self.retention.as_secs().max(1),
            )
            .ignore()
            .zrem(self.index_key(keys::other_status(status)), &state.user_id)
            .ignore()
            .zadd(self.index_key(status), &state.user_id, state.list_sort_key())
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        debug!(
            user_id = %state.user_id,
            status = %status,
            sort_key = state.list_sort_key(),
            "Stored activity record"
        );
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> AppResult<ActivityPage> {
        let offset = Self::parse_offset(query.cursor.as_deref())?;
        let limit = query.limit.max(1) as isize;
        let index_key = self.index_key(query.status);
        let max = match query.before {
            Some(before) => format!("({}", before.timestamp_millis()),
            None => "+inf".to_string(),
        };
        let mut conn = self.client.conn_mut();

        let user_ids: Vec<String> = conn
            .zrangebyscore_limit(&index_key, "-inf", max, offset, limit)
            .await
            .map_err(Self::map_err)?;
        if user_ids.is_empty() {
            return Ok(ActivityPage::default());
        }

        let record_keys: Vec<String> = user_ids.iter().map(|id| self.record_key(id)).collect();
        let raws: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&record_keys)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        let (page, dangling) = assemble_page(query.status, offset, limit, user_ids, raws);

        if !dangling.is_empty() {
            warn!(count = dangling.len(), index = %index_key, "Removing index entries for expired records");
            let _: () = conn
                .zrem(&index_key, &dangling)
                .await
                .map_err(Self::map_err)?;
        }

        Ok(page)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}

/// Decode one ZRANGEBYSCORE window and its MGET results into a page.
///
/// Returns the page and the index entries whose record has expired. Those
/// entries are removed from the index by the caller, so the next offset
/// steps back by their count.
fn assemble_page(
    status: ListStatus,
    offset: isize,
    limit: isize,
    user_ids: Vec<String>,
    raws: Vec<Option<String>>,
) -> (ActivityPage, Vec<String>) {
    let fetched = user_ids.len() as isize;
    let mut items = Vec::with_capacity(user_ids.len());
    let mut dangling = Vec::new();
    for (user_id, raw) in user_ids.into_iter().zip(raws) {
        let Some(raw) = raw else {
            dangling.push(user_id);
            continue;
        };
        match serde_json::from_str::<ActivityState>(&raw) {
            Ok(state) if state.list_status() == status => items.push(state),
            Ok(_) => {
                warn!(user_id = %user_id, status = %status, "Index entry disagrees with record, skipping");
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Skipping undecodable activity record");
            }
        }
    }

    let next_cursor =
        (fetched == limit).then(|| (offset + limit - dangling.len() as isize).to_string());
    (ActivityPage { items, next_cursor }, dangling)
}
