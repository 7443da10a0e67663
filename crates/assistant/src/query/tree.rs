//! Navigation tree derivation
//!
//! Derives the sidebar's hierarchical view (folders with their
//! sessions, ungrouped sessions, flat document list) from the flat
//! workspace sets. Pure: same inputs always yield the same tree, no
//! I/O, no side effects. Expansion/collapse state is UI-only and not
//! part of this derivation.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Result;
use crate::models::{Document, Folder, Session};
use crate::storage::WorkspaceStore;

/// A folder together with the sessions grouped under it
#[derive(Debug, Clone, Serialize)]
pub struct FolderNode {
    pub folder: Folder,
    pub sessions: Vec<Session>,
}

/// The derived sidebar view
#[derive(Debug, Clone, Default, Serialize)]
pub struct NavigationTree {
    /// Folders in input order, each with its sessions in input order
    pub folders: Vec<FolderNode>,
    /// Sessions without a folder, or whose folder is not loaded
    pub ungrouped: Vec<Session>,
    /// Flat document list, in input order
    pub documents: Vec<Document>,
}

impl NavigationTree {
    /// Total number of sessions across folders and ungrouped
    pub fn session_count(&self) -> usize {
        self.ungrouped.len() + self.folders.iter().map(|n| n.sessions.len()).sum::<usize>()
    }
}

/// Build the navigation tree from flat folder, session, and document
/// lists.
///
/// A session whose folder_id references a folder not present in
/// `folders` is classified as ungrouped rather than dropped or
/// treated as an error.
pub fn build_navigation_tree(
    folders: &[Folder],
    sessions: &[Session],
    documents: &[Document],
) -> NavigationTree {
    let mut nodes: Vec<FolderNode> = folders
        .iter()
        .map(|folder| FolderNode {
            folder: folder.clone(),
            sessions: Vec::new(),
        })
        .collect();

    let index: HashMap<&str, usize> = folders
        .iter()
        .enumerate()
        .map(|(i, folder)| (folder.id.as_str(), i))
        .collect();

    let mut ungrouped = Vec::new();
    for session in sessions {
        match session
            .folder_id
            .as_ref()
            .and_then(|id| index.get(id.as_str()))
        {
            Some(&i) => nodes[i].sessions.push(session.clone()),
            None => ungrouped.push(session.clone()),
        }
    }

    NavigationTree {
        folders: nodes,
        ungrouped,
        documents: documents.to_vec(),
    }
}

/// Build the navigation tree from the current workspace store contents
pub fn navigation_tree(store: &dyn WorkspaceStore) -> Result<NavigationTree> {
    let folders = store.list_folders()?;
    let sessions = store.list_sessions()?;
    let documents = store.list_documents()?;
    Ok(build_navigation_tree(&folders, &sessions, &documents))
}
