//! Message model representing one chat message

use super::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix marking a client-local message id not yet persisted by the backend
const TEMP_ID_PREFIX: &str = "temp-";

/// Counter disambiguating temporary ids minted within the same millisecond
static TEMP_ID_SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for a message
///
/// Either a server-assigned id or a temporary client-local id minted
/// by [`MessageId::temporary`] while a send is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Mint a fresh temporary id for an optimistic message
    ///
    /// Ids are unique within the process even when minted in rapid
    /// succession, so cleanup can always remove exactly the message
    /// it inserted.
    pub fn temporary() -> Self {
        let seq = TEMP_ID_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!(
            "{}{}-{}",
            TEMP_ID_PREFIX,
            Utc::now().timestamp_millis(),
            seq
        ))
    }

    /// Whether this id is a client-local placeholder
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_ID_PREFIX)
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single message within a session
///
/// Messages form an ordered sequence per session; insertion order is
/// chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub is_user: bool,
    pub created_at: DateTime<Utc>,
    pub session_id: SessionId,
}

impl Message {
    /// Create a user message with a temporary id, for optimistic display
    pub fn pending_user(session_id: SessionId, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::temporary(),
            content: content.into(),
            is_user: true,
            created_at: Utc::now(),
            session_id,
        }
    }
}
