//! Presence notifications.

use serde::{Deserialize, Serialize};

/// The universal "fully logged out" system presence.
pub const OFFLINE: &str = "offline";

/// Check whether a system presence is the offline value.
pub fn is_offline(presence: &str) -> bool {
    presence.trim().eq_ignore_ascii_case(OFFLINE)
}

/// Reference to a presence definition carried by a presence notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresenceDefinitionRef {
    /// Fine-grained presence definition id.
    pub id: String,
    /// Coarse system presence, e.g. `AVAILABLE`, `OFFLINE`.
    pub system_presence: String,
}

/// Body of a `v2.users.{id}.presence` notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresenceUpdate {
    pub presence_definition: PresenceDefinitionRef,
    pub message: Option<String>,
    pub source: Option<String>,
    pub modified_date: Option<String>,
}

impl PresenceUpdate {
    /// Build an update from a system presence and definition id.
    pub fn new(system_presence: impl Into<String>, definition_id: impl Into<String>) -> Self {
        Self {
            presence_definition: PresenceDefinitionRef {
                id: definition_id.into(),
                system_presence: system_presence.into(),
            },
            ..Default::default()
        }
    }

    /// Coarse system presence of this update.
    pub fn system_presence(&self) -> &str {
        &self.presence_definition.system_presence
    }

    /// Fine-grained presence definition id of this update.
    pub fn definition_id(&self) -> &str {
        &self.presence_definition.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_presence_body() {
        let body = r#"{
            "source": "PURECLOUD",
            "presenceDefinition": {"id": "6a3af858", "systemPresence": "AVAILABLE"},
            "message": ""
        }"#;
        let update: PresenceUpdate = serde_json::from_str(body).unwrap();
        assert_eq!(update.system_presence(), "AVAILABLE");
        assert_eq!(update.definition_id(), "6a3af858");
    }

    #[test]
    fn test_offline_is_case_insensitive() {
        assert!(is_offline("OFFLINE"));
        assert!(is_offline("Offline"));
        assert!(!is_offline("available"));
    }
}
