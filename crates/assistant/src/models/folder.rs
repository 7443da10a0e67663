//! Folder model for grouping chat sessions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a folder (server-assigned)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderId(pub String);

impl FolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FolderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FolderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A user-defined grouping of sessions
///
/// Folders reference sessions by id only; deleting a folder does not
/// cascade to its sessions in this client model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_count: Option<u32>,
}

impl Folder {
    /// Create a new folder
    pub fn new(id: impl Into<FolderId>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at,
            session_count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_wire_format() {
        let json = r#"{"id":"f1","name":"Biology","createdAt":"2026-01-02T03:04:05Z","sessionCount":2}"#;
        let folder: Folder = serde_json::from_str(json).unwrap();
        assert_eq!(folder.id.as_str(), "f1");
        assert_eq!(folder.session_count, Some(2));
    }
}
