//! Session model representing one chat conversation

use super::FolderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a chat session (server-assigned)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One chat conversation thread
///
/// `folder_id` is a weak reference: it may point at a folder that is
/// no longer loaded, in which case the navigation tree classifies the
/// session as ungrouped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u32>,
}

impl Session {
    /// Create a new session
    pub fn new(
        id: impl Into<SessionId>,
        name: impl Into<String>,
        folder_id: Option<FolderId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            folder_id,
            created_at,
            last_message: None,
            message_count: None,
        }
    }
}

/// Default display name for a freshly created session
pub(crate) fn default_session_name(now: DateTime<Utc>) -> String {
    format!("Chat {}", now.format("%Y-%m-%d %H:%M"))
}
