//! Assistant crate - Client engine for the nightprep learning app
//!
//! This crate provides platform-independent assistant functionality:
//! - Domain models (Session, Folder, Message, Document, User)
//! - Backend REST client with bearer-token auth
//! - In-memory workspace store behind a trait
//! - Navigation tree derivation for UI consumption
//! - Action handlers for workspace mutations
//! - Chat controller with optimistic sends and rollback
//! - Auth session manager with persisted token
//!
//! This crate has zero UI dependencies; an embedding app drives it
//! through [`AssistantService`] or the individual components.

pub mod actions;
pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod service;
pub mod storage;

pub use actions::{LoadStats, WorkspaceHandler};
pub use api::ApiClient;
pub use auth::AuthManager;
pub use chat::{ChatController, PendingSend};
pub use config::ServerConfig;
pub use error::{Error, Result};
pub use models::{
    Document, DocumentId, Folder, FolderId, Message, MessageId, Session, SessionId, User,
};
pub use query::{FolderNode, NavigationTree, build_navigation_tree, navigation_tree};
pub use service::AssistantService;
pub use storage::{InMemoryWorkspaceStore, WorkspaceStore};
