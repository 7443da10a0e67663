//! Document model for uploaded files

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an uploaded document (server-assigned)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An uploaded file the assistant can answer questions about
///
/// Independent entity; not nested under a folder or session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    /// File size in bytes
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub url: String,
}

impl Document {
    /// Create a new document
    pub fn new(
        id: impl Into<DocumentId>,
        name: impl Into<String>,
        size: u64,
        uploaded_at: DateTime<Utc>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            uploaded_at,
            url: url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_wire_format() {
        let json = r#"{"id":"d1","name":"notes.pdf","size":1024,"uploadedAt":"2026-01-02T03:04:05Z","url":"/pdf/d1"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id.as_str(), "d1");
        assert_eq!(doc.size, 1024);
    }
}
