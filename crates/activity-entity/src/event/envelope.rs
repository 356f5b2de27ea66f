//! Event bus envelope wrapping a directory notification.

use activity_core::error::ErrorKind;
use activity_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use super::topic::{Topic, TopicKind};
use crate::conversation::ConversationSummary;
use crate::presence::PresenceUpdate;

/// The outer event as delivered by the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "detail-type", default)]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    pub detail: EventDetail,
}

/// The notification carried by an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub topic_name: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub event_body: serde_json::Value,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Decoded notification body.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEventKind {
    Presence(PresenceUpdate),
    Conversation(ConversationSummary),
}

/// A notification ready for reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub user_id: String,
    pub kind: InboundEventKind,
}

impl InboundEvent {
    /// Decode an envelope: parse the topic, then the body matching its kind.
    pub fn from_envelope(envelope: &EventEnvelope) -> AppResult<Self> {
        let topic: Topic = envelope.detail.topic_name.parse()?;
        let body = envelope.detail.event_body.clone();
        if !body.is_object() {
            return Err(AppError::validation(format!(
                "Event body for '{}' is not an object",
                envelope.detail.topic_name
            )));
        }

        let kind = match topic.kind {
            TopicKind::Presence => InboundEventKind::Presence(decode_body(body, topic.kind)?),
            TopicKind::ConversationSummary => {
                InboundEventKind::Conversation(decode_body(body, topic.kind)?)
            }
        };

        Ok(Self {
            user_id: topic.user_id,
            kind,
        })
    }

    /// Decode raw envelope JSON.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let envelope: EventEnvelope = serde_json::from_str(raw).map_err(|e| {
            AppError::with_source(ErrorKind::Validation, format!("Malformed envelope: {e}"), e)
        })?;
        Self::from_envelope(&envelope)
    }

    /// Short name of the event kind for logging.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            InboundEventKind::Presence(_) => TopicKind::Presence.as_str(),
            InboundEventKind::Conversation(_) => TopicKind::ConversationSummary.as_str(),
        }
    }
}

fn decode_body<T: serde::de::DeserializeOwned>(
    body: serde_json::Value,
    kind: TopicKind,
) -> AppResult<T> {
    serde_json::from_value(body).map_err(|e| {
        AppError::with_source(ErrorKind::Validation, format!("Malformed {kind} body: {e}"), e)
    })
}
