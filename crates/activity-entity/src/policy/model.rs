//! Timeout group and policy models.

use std::collections::HashMap;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use activity_core::config::TimeoutGroupConfig;

/// A named policy bucket mapping a directory group to a permitted idle duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutGroup {
    /// Directory group id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Permitted inactivity in minutes.
    pub timeout_minutes: i64,
}

impl TimeoutGroup {
    /// The permitted inactivity as a duration, `None` when out of range.
    pub fn timeout(&self) -> Option<TimeDelta> {
        TimeDelta::try_minutes(self.timeout_minutes)
    }

    /// Label used by the report, e.g. `Timeout Group - agents (15 minutes)`.
    pub fn display_label(&self) -> String {
        format!("{} ({} minutes)", self.name, self.timeout_minutes)
    }
}

impl From<&TimeoutGroupConfig> for TimeoutGroup {
    fn from(config: &TimeoutGroupConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            timeout_minutes: config.timeout_minutes,
        }
    }
}

/// Immutable set of timeout groups, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct TimeoutPolicy {
    groups: Vec<TimeoutGroup>,
    index: HashMap<String, usize>,
}

impl TimeoutPolicy {
    /// Build a policy from already validated groups.
    pub fn new(groups: Vec<TimeoutGroup>) -> Self {
        let index = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.id.clone(), i))
            .collect();
        Self { groups, index }
    }

    /// Build a policy from the `timeout_groups` configuration section.
    pub fn from_config(groups: &[TimeoutGroupConfig]) -> Self {
        Self::new(groups.iter().map(TimeoutGroup::from).collect())
    }

    /// Look up a configured group by id.
    pub fn get(&self, group_id: &str) -> Option<&TimeoutGroup> {
        self.index.get(group_id).map(|&i| &self.groups[i])
    }

    /// All configured groups in configuration order.
    pub fn groups(&self) -> &[TimeoutGroup] {
        &self.groups
    }

    /// Choose the governing group among a user's memberships.
    ///
    /// Picks the configured group with the strictly greatest timeout. On a
    /// tie the first one encountered in `member_of` wins. Returns `None`
    /// when no membership is configured.
    pub fn resolve<'a, I>(&self, member_of: I) -> Option<&TimeoutGroup>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut chosen: Option<&TimeoutGroup> = None;
        for group_id in member_of {
            let Some(candidate) = self.get(group_id) else {
                continue;
            };
            match chosen {
                Some(current) if candidate.timeout_minutes <= current.timeout_minutes => {}
                _ => chosen = Some(candidate),
            }
        }
        chosen
    }
}
