//! Conversation summary notifications.

use serde::{Deserialize, Serialize};

/// Live and wrap-up counts for one queue type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelActivity {
    /// Interactions in progress.
    pub active: i64,
    /// Interactions in after-call work.
    pub acw: i64,
}

impl ChannelActivity {
    /// Whether either count is positive.
    pub fn any(&self) -> bool {
        self.active > 0 || self.acw > 0
    }
}

/// Counts for one channel split by queue type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelMetrics {
    pub contact_center: ChannelActivity,
    pub enterprise: ChannelActivity,
}

impl ChannelMetrics {
    /// Whether any queue type reports work.
    pub fn any(&self) -> bool {
        self.contact_center.any() || self.enterprise.any()
    }
}

/// Per-channel conversation counts for a user.
///
/// Missing channels or counts decode as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversationSummary {
    pub call: ChannelMetrics,
    pub callback: ChannelMetrics,
    pub chat: ChannelMetrics,
    pub email: ChannelMetrics,
    pub message: ChannelMetrics,
    pub social_expression: ChannelMetrics,
    pub video: ChannelMetrics,
}

impl ConversationSummary {
    /// All channels in a fixed order.
    pub fn channels(&self) -> [&ChannelMetrics; 7] {
        [
            &self.call,
            &self.callback,
            &self.chat,
            &self.email,
            &self.message,
            &self.social_expression,
            &self.video,
        ]
    }

    /// True if any of the 28 counts is positive.
    pub fn any_active(&self) -> bool {
        self.channels().iter().any(|c| c.any())
    }
}
