//! Workspace storage: single source of truth for folders, sessions,
//! and documents fetched from the backend

mod memory;
mod traits;

pub use memory::InMemoryWorkspaceStore;
pub use traits::WorkspaceStore;
