//! Workspace action handler
//!
//! Coordinates between the backend API and local storage for
//! mutations. Actions are performed in two steps:
//! 1. Call the backend to update server state
//! 2. Update local storage to reflect the change
//!
//! This keeps the server the source of truth: if a backend call
//! fails, its local half is never applied.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};

use crate::api::ApiClient;
use crate::api::types::{DocumentAnswer, UpdateSessionRequest};
use crate::error::{Error, Result};
use crate::models::{
    Document, DocumentId, Folder, FolderId, Session, SessionId, default_session_name,
};
use crate::storage::WorkspaceStore;

/// Counts from a full workspace load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    pub folders: usize,
    pub sessions: usize,
    pub documents: usize,
    /// Resource types that failed to load (each logged, none fatal)
    pub failures: usize,
}

/// Handler for workspace mutations: folders, sessions, documents
pub struct WorkspaceHandler {
    api: Arc<ApiClient>,
    store: Arc<dyn WorkspaceStore>,
}

impl WorkspaceHandler {
    /// Create a new workspace handler
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn WorkspaceStore>) -> Self {
        Self { api, store }
    }

    /// Fetch folders, sessions, and documents from the backend.
    ///
    /// Each fetch is independent: a failure in one resource type is
    /// logged and counted, not fatal to the whole load. Only two
    /// conditions fail the call: an authorization failure (which must
    /// propagate for the global logout) and all three fetches failing.
    pub fn load_all(&self) -> Result<LoadStats> {
        let mut stats = LoadStats::default();
        let mut last_error = None;

        match self.api.list_folders() {
            Ok(folders) => {
                stats.folders = folders.len();
                self.store.replace_folders(folders)?;
            }
            Err(Error::Unauthorized) => return Err(Error::Unauthorized),
            Err(err) => {
                warn!("failed to load folders: {}", err);
                stats.failures += 1;
                last_error = Some(err);
            }
        }

        match self.api.list_sessions() {
            Ok(sessions) => {
                stats.sessions = sessions.len();
                self.store.replace_sessions(sessions)?;
            }
            Err(Error::Unauthorized) => return Err(Error::Unauthorized),
            Err(err) => {
                warn!("failed to load sessions: {}", err);
                stats.failures += 1;
                last_error = Some(err);
            }
        }

        match self.api.list_documents() {
            Ok(documents) => {
                stats.documents = documents.len();
                self.store.replace_documents(documents)?;
            }
            Err(Error::Unauthorized) => return Err(Error::Unauthorized),
            Err(err) => {
                warn!("failed to load documents: {}", err);
                stats.failures += 1;
                last_error = Some(err);
            }
        }

        if stats.failures == 3 {
            return Err(last_error.unwrap_or_else(|| Error::Network("load failed".to_string())));
        }

        info!(
            "loaded workspace: {} folders, {} sessions, {} documents",
            stats.folders, stats.sessions, stats.documents
        );
        Ok(stats)
    }

    /// Create a folder with the given name
    pub fn create_folder(&self, name: &str) -> Result<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("folder name is required".to_string()));
        }

        let folder = self.api.create_folder(name)?;
        info!("created folder {} ({})", folder.name, folder.id.as_str());
        self.store.upsert_folder(folder.clone())?;
        Ok(folder)
    }

    /// Rename a folder
    pub fn rename_folder(&self, id: &FolderId, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("folder name is required".to_string()));
        }

        self.api.update_folder(id, name)?;
        if let Some(mut folder) = self.store.get_folder(id)? {
            folder.name = name.to_string();
            self.store.upsert_folder(folder)?;
        }
        Ok(())
    }

    /// Delete a folder. Sessions keep their (now dangling) reference
    /// and show up as ungrouped; the server decides any cascade.
    pub fn delete_folder(&self, id: &FolderId) -> Result<()> {
        self.api.delete_folder(id)?;
        info!("deleted folder {}", id.as_str());
        self.store.remove_folder(id)
    }

    /// Create a chat session, optionally inside a folder.
    ///
    /// An empty name gets the default timestamped one.
    pub fn create_session(&self, name: &str, folder_id: Option<&FolderId>) -> Result<Session> {
        let name = name.trim();
        let name = if name.is_empty() {
            default_session_name(Utc::now())
        } else {
            name.to_string()
        };

        let session = self.api.create_session(&name, folder_id)?;
        info!("created session {} ({})", session.name, session.id.as_str());
        self.store.upsert_session(session.clone())?;
        Ok(session)
    }

    /// Rename a session
    pub fn rename_session(&self, id: &SessionId, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("session name is required".to_string()));
        }

        self.api.update_session(
            id,
            &UpdateSessionRequest {
                name: Some(name.to_string()),
                folder_id: None,
            },
        )?;
        if let Some(mut session) = self.store.get_session(id)? {
            session.name = name.to_string();
            self.store.upsert_session(session)?;
        }
        Ok(())
    }

    /// Move a session into a folder, or out of any folder with None
    /// (serialized as an explicit `folderId: null`)
    pub fn move_session(&self, id: &SessionId, folder_id: Option<&FolderId>) -> Result<()> {
        self.api.update_session(
            id,
            &UpdateSessionRequest {
                name: None,
                folder_id: Some(folder_id.map(|f| f.0.clone())),
            },
        )?;
        if let Some(mut session) = self.store.get_session(id)? {
            session.folder_id = folder_id.cloned();
            self.store.upsert_session(session)?;
        }
        Ok(())
    }

    /// Delete a session. Irreversible; the embedding UI is expected
    /// to confirm with the user first.
    pub fn delete_session(&self, id: &SessionId) -> Result<()> {
        self.api.delete_session(id)?;
        info!("deleted session {}", id.as_str());
        self.store.remove_session(id)
    }

    /// Upload a document from a local file
    pub fn upload_document(&self, path: &Path) -> Result<Document> {
        if !path.is_file() {
            return Err(Error::Validation(format!(
                "no such file: {}",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Validation("file name is not valid UTF-8".to_string()))?;
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Validation(format!("could not read {}: {}", path.display(), e)))?;

        let document = self.api.upload_document(file_name, &bytes)?;
        info!(
            "uploaded document {} ({} bytes)",
            document.name, document.size
        );
        self.store.upsert_document(document.clone())?;
        Ok(document)
    }

    /// Delete an uploaded document
    pub fn delete_document(&self, id: &DocumentId) -> Result<()> {
        self.api.delete_document(id)?;
        info!("deleted document {}", id.as_str());
        self.store.remove_document(id)
    }

    /// Ask a question about an uploaded document
    pub fn ask_document(&self, id: &DocumentId, question: &str) -> Result<DocumentAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::Validation("question is required".to_string()));
        }
        self.api.ask_document(id, question)
    }
}
