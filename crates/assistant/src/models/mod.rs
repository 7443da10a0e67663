//! Domain models for the assistant workspace

mod document;
mod folder;
mod message;
mod session;
mod user;

pub use document::{Document, DocumentId};
pub use folder::{Folder, FolderId};
pub use message::{Message, MessageId};
pub use session::{Session, SessionId};
pub(crate) use session::default_session_name;
pub use user::User;
