//! Notification topic names: `v2.users.<uuid>.presence` and
//! `v2.users.<uuid>.conversationsummary`.

use std::fmt;
use std::str::FromStr;

use activity_core::AppError;
use uuid::Uuid;

/// The kind of user notification a topic carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicKind {
    /// Presence changed.
    Presence,
    /// Conversation counts changed.
    ConversationSummary,
}

impl TopicKind {
    /// The trailing topic segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Presence => "presence",
            Self::ConversationSummary => "conversationsummary",
        }
    }
}

impl fmt::Display for TopicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed user notification topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// User id in lowercase hyphenated form.
    pub user_id: String,
    /// Notification kind.
    pub kind: TopicKind,
}

impl Topic {
    /// Render the topic name for a user.
    pub fn name(&self) -> String {
        format!("v2.users.{}.{}", self.user_id, self.kind)
    }
}

impl FromStr for Topic {
    type Err = AppError;

    fn from_str(topic: &str) -> Result<Self, Self::Err> {
        let unrecognized = || AppError::validation(format!("Unrecognized topic: '{topic}'"));

        let mut parts = topic.split('.');
        let (Some("v2"), Some("users"), Some(user_id), Some(kind), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(unrecognized());
        };

        let kind = match kind {
            "presence" => TopicKind::Presence,
            "conversationsummary" => TopicKind::ConversationSummary,
            _ => return Err(unrecognized()),
        };

        // Only the canonical lowercase hyphenated form is accepted.
        let parsed = Uuid::try_parse(user_id).map_err(|_| unrecognized())?;
        if parsed.hyphenated().to_string() != user_id {
            return Err(unrecognized());
        }

        Ok(Self {
            user_id: user_id.to_string(),
            kind,
        })
    }
}
