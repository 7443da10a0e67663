//! In-memory storage implementation
//!
//! The engine refetches everything per login, so in-memory maps are
//! the only storage backend; the trait still leaves room for a
//! persistent cache later.

use std::collections::HashMap;
use std::sync::RwLock;

use super::WorkspaceStore;
use crate::error::Result;
use crate::models::{Document, DocumentId, Folder, FolderId, Session, SessionId};

/// In-memory implementation of WorkspaceStore
///
/// Uses HashMaps protected by RwLocks for thread-safe access.
pub struct InMemoryWorkspaceStore {
    folders: RwLock<HashMap<String, Folder>>,
    sessions: RwLock<HashMap<String, Session>>,
    documents: RwLock<HashMap<String, Document>>,
}

impl InMemoryWorkspaceStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            folders: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryWorkspaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceStore for InMemoryWorkspaceStore {
    fn upsert_folder(&self, folder: Folder) -> Result<()> {
        let mut folders = self.folders.write().unwrap();
        folders.insert(folder.id.0.clone(), folder);
        Ok(())
    }

    fn get_folder(&self, id: &FolderId) -> Result<Option<Folder>> {
        let folders = self.folders.read().unwrap();
        Ok(folders.get(&id.0).cloned())
    }

    fn remove_folder(&self, id: &FolderId) -> Result<()> {
        let mut folders = self.folders.write().unwrap();
        folders.remove(&id.0);
        Ok(())
    }

    fn list_folders(&self) -> Result<Vec<Folder>> {
        let folders = self.folders.read().unwrap();
        let mut list: Vec<_> = folders.values().cloned().collect();

        // Sort by created_at ascending, id as tiebreaker for determinism
        list.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });

        Ok(list)
    }

    fn replace_folders(&self, new: Vec<Folder>) -> Result<()> {
        let mut folders = self.folders.write().unwrap();
        folders.clear();
        for folder in new {
            folders.insert(folder.id.0.clone(), folder);
        }
        Ok(())
    }

    fn upsert_session(&self, session: Session) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.id.0.clone(), session);
        Ok(())
    }

    fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.get(&id.0).cloned())
    }

    fn remove_session(&self, id: &SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(&id.0);
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().unwrap();
        let mut list: Vec<_> = sessions.values().cloned().collect();

        list.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });

        Ok(list)
    }

    fn replace_sessions(&self, new: Vec<Session>) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.clear();
        for session in new {
            sessions.insert(session.id.0.clone(), session);
        }
        Ok(())
    }

    fn upsert_document(&self, document: Document) -> Result<()> {
        let mut documents = self.documents.write().unwrap();
        documents.insert(document.id.0.clone(), document);
        Ok(())
    }

    fn remove_document(&self, id: &DocumentId) -> Result<()> {
        let mut documents = self.documents.write().unwrap();
        documents.remove(&id.0);
        Ok(())
    }

    fn list_documents(&self) -> Result<Vec<Document>> {
        let documents = self.documents.read().unwrap();
        let mut list: Vec<_> = documents.values().cloned().collect();

        list.sort_by(|a, b| {
            a.uploaded_at
                .cmp(&b.uploaded_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });

        Ok(list)
    }

    fn replace_documents(&self, new: Vec<Document>) -> Result<()> {
        let mut documents = self.documents.write().unwrap();
        documents.clear();
        for document in new {
            documents.insert(document.id.0.clone(), document);
        }
        Ok(())
    }

    fn record_last_message(&self, id: &SessionId, preview: &str) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(session) = sessions.get_mut(&id.0) {
            session.last_message = Some(preview.to_string());
            // One send persists a user/assistant pair
            session.message_count = Some(session.message_count.unwrap_or(0) + 2);
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.folders.write().unwrap().clear();
        self.sessions.write().unwrap().clear();
        self.documents.write().unwrap().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn make_folder(id: &str, name: &str, age_hours: i64) -> Folder {
        Folder::new(id, name, Utc::now() - Duration::hours(age_hours))
    }

    fn make_session(id: &str, name: &str, folder: Option<&str>, age_hours: i64) -> Session {
        Session::new(
            id,
            name,
            folder.map(FolderId::new),
            Utc::now() - Duration::hours(age_hours),
        )
    }

    fn make_document(id: &str, name: &str, age_hours: i64) -> Document {
        Document::new(
            id,
            name,
            1024,
            Utc::now() - Duration::hours(age_hours),
            format!("/pdf/{}", id),
        )
    }

    #[test]
    fn test_upsert_and_get_folder() {
        let store = InMemoryWorkspaceStore::new();
        store.upsert_folder(make_folder("f1", "Biology", 1)).unwrap();

        let folder = store.get_folder(&FolderId::new("f1")).unwrap();
        assert_eq!(folder.unwrap().name, "Biology");
    }

    #[test]
    fn test_list_folders_sorted_by_creation() {
        let store = InMemoryWorkspaceStore::new();
        store.upsert_folder(make_folder("f1", "Newest", 0)).unwrap();
        store.upsert_folder(make_folder("f2", "Oldest", 5)).unwrap();
        store.upsert_folder(make_folder("f3", "Middle", 2)).unwrap();

        let folders = store.list_folders().unwrap();
        let names: Vec<_> = folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Oldest", "Middle", "Newest"]);
    }

    #[test]
    fn test_remove_folder_keeps_sessions() {
        let store = InMemoryWorkspaceStore::new();
        store.upsert_folder(make_folder("f1", "Biology", 1)).unwrap();
        store
            .upsert_session(make_session("s1", "Chat", Some("f1"), 1))
            .unwrap();

        store.remove_folder(&FolderId::new("f1")).unwrap();

        assert!(store.get_folder(&FolderId::new("f1")).unwrap().is_none());
        // The session survives with its now-dangling folder reference
        let session = store.get_session(&SessionId::new("s1")).unwrap().unwrap();
        assert_eq!(session.folder_id, Some(FolderId::new("f1")));
    }

    #[test]
    fn test_replace_sessions_drops_stale_entries() {
        let store = InMemoryWorkspaceStore::new();
        store
            .upsert_session(make_session("s1", "Old", None, 2))
            .unwrap();

        store
            .replace_sessions(vec![make_session("s2", "Fresh", None, 1)])
            .unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id.as_str(), "s2");
    }

    #[test]
    fn test_record_last_message() {
        let store = InMemoryWorkspaceStore::new();
        store
            .upsert_session(make_session("s1", "Chat", None, 1))
            .unwrap();

        store
            .record_last_message(&SessionId::new("s1"), "the answer")
            .unwrap();
        store
            .record_last_message(&SessionId::new("s1"), "another answer")
            .unwrap();

        let session = store.get_session(&SessionId::new("s1")).unwrap().unwrap();
        assert_eq!(session.last_message.as_deref(), Some("another answer"));
        assert_eq!(session.message_count, Some(4));
    }

    #[test]
    fn test_record_last_message_missing_session_is_noop() {
        let store = InMemoryWorkspaceStore::new();
        store
            .record_last_message(&SessionId::new("ghost"), "x")
            .unwrap();
    }

    #[test]
    fn test_list_documents_sorted_by_upload() {
        let store = InMemoryWorkspaceStore::new();
        store.upsert_document(make_document("d1", "new.pdf", 0)).unwrap();
        store.upsert_document(make_document("d2", "old.pdf", 3)).unwrap();

        let docs = store.list_documents().unwrap();
        assert_eq!(docs[0].name, "old.pdf");
        assert_eq!(docs[1].name, "new.pdf");
    }

    #[test]
    fn test_clear() {
        let store = InMemoryWorkspaceStore::new();
        store.upsert_folder(make_folder("f1", "Biology", 1)).unwrap();
        store
            .upsert_session(make_session("s1", "Chat", Some("f1"), 1))
            .unwrap();
        store.upsert_document(make_document("d1", "notes.pdf", 1)).unwrap();

        store.clear().unwrap();

        assert!(store.list_folders().unwrap().is_empty());
        assert!(store.list_sessions().unwrap().is_empty());
        assert!(store.list_documents().unwrap().is_empty());
    }
}
