//! Directory user and presence definition models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::conversation::ConversationSummary;
use crate::presence::PresenceUpdate;

/// Resolution of the thumbnail shown in reports.
pub const THUMBNAIL_RESOLUTION: &str = "x48";

/// A group membership reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectoryGroup {
    pub id: String,
    pub self_uri: Option<String>,
}

/// One rendition of a user's profile image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserImage {
    pub resolution: String,
    pub image_uri: String,
}

/// Organization reference attached to a user when expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationRef {
    pub id: String,
    pub name: Option<String>,
}

/// Authoritative snapshot of a user from the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectoryUser {
    pub id: String,
    pub name: String,
    pub state: Option<String>,
    pub groups: Vec<DirectoryGroup>,
    pub presence: PresenceUpdate,
    pub conversation_summary: ConversationSummary,
    pub images: Vec<UserImage>,
    pub organization: Option<OrganizationRef>,
}

impl DirectoryUser {
    /// Group ids in the order the directory returned them.
    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.id.as_str())
    }

    /// URI of the x48 thumbnail, if the user has one.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|image| image.resolution == THUMBNAIL_RESOLUTION)
            .map(|image| image.image_uri.as_str())
    }
}

/// A presence definition with its localized labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresenceDefinition {
    pub id: String,
    pub name: Option<String>,
    pub system_presence: String,
    pub language_labels: HashMap<String, String>,
    pub deactivated: bool,
}

impl PresenceDefinition {
    /// Label for the given locale, if defined.
    pub fn label(&self, locale: &str) -> Option<&str> {
        self.language_labels.get(locale).map(String::as_str)
    }
}

/// A page of entities as returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPage<T> {
    #[serde(default = "Vec::new")]
    pub entities: Vec<T>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page_count: Option<u32>,
}
