//! Action handlers for workspace mutations

mod handler;

pub use handler::{LoadStats, WorkspaceHandler};
