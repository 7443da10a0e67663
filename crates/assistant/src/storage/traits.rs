//! Storage trait definitions

use crate::error::Result;
use crate::models::{Document, DocumentId, Folder, FolderId, Session, SessionId};

/// Trait for workspace storage operations
///
/// Abstracts over storage backends and provides the CRUD operations
/// the engine needs for folders, sessions, and documents. The UI
/// layer owns no independent copy of this data.
pub trait WorkspaceStore: Send + Sync {
    /// Insert or update a folder
    fn upsert_folder(&self, folder: Folder) -> Result<()>;

    /// Get a folder by ID
    fn get_folder(&self, id: &FolderId) -> Result<Option<Folder>>;

    /// Remove a folder; sessions referencing it are left untouched
    fn remove_folder(&self, id: &FolderId) -> Result<()>;

    /// List folders, ordered by created_at ascending
    fn list_folders(&self) -> Result<Vec<Folder>>;

    /// Replace the full folder set (fresh load from the backend)
    fn replace_folders(&self, folders: Vec<Folder>) -> Result<()>;

    /// Insert or update a session
    fn upsert_session(&self, session: Session) -> Result<()>;

    /// Get a session by ID
    fn get_session(&self, id: &SessionId) -> Result<Option<Session>>;

    /// Remove a session
    fn remove_session(&self, id: &SessionId) -> Result<()>;

    /// List sessions, ordered by created_at ascending
    fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Replace the full session set (fresh load from the backend)
    fn replace_sessions(&self, sessions: Vec<Session>) -> Result<()>;

    /// Insert or update a document
    fn upsert_document(&self, document: Document) -> Result<()>;

    /// Remove a document
    fn remove_document(&self, id: &DocumentId) -> Result<()>;

    /// List documents, ordered by uploaded_at ascending
    fn list_documents(&self) -> Result<Vec<Document>>;

    /// Replace the full document set (fresh load from the backend)
    fn replace_documents(&self, documents: Vec<Document>) -> Result<()>;

    /// Update a session's last-message preview and bump its count
    fn record_last_message(&self, id: &SessionId, preview: &str) -> Result<()>;

    /// Clear all data (logout teardown)
    fn clear(&self) -> Result<()>;
}
