//! Chat controller: message list and send lifecycle for one active
//! session
//!
//! A send runs in two phases so the state machine is testable without
//! a backend: `begin_send` appends an optimistic user message and
//! returns a [`PendingSend`] capturing the exact temporary id;
//! `complete_send` reconciles the backend outcome against it.
//! `send_message` chains the two around the network call.

use std::sync::Arc;

use log::info;

use crate::api::ApiClient;
use crate::api::types::{SendMessageResponse, UpdateSessionRequest};
use crate::error::{Error, Result};
use crate::models::{Message, MessageId, Session, SessionId};
use crate::storage::WorkspaceStore;

/// An in-flight send, captured at `begin_send` time
///
/// Carries the exact temporary message id inserted optimistically.
/// Cleanup always removes by this id; it is never recomputed, so a
/// later send can never be confused with an earlier one.
#[derive(Debug)]
pub struct PendingSend {
    temp_id: MessageId,
    session_id: SessionId,
    content: String,
}

impl PendingSend {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Owns the message list and send lifecycle for exactly one active
/// session at a time
pub struct ChatController {
    api: Arc<ApiClient>,
    store: Arc<dyn WorkspaceStore>,
    session: Option<Session>,
    messages: Vec<Message>,
    in_flight: bool,
}

impl ChatController {
    /// Create a controller with no active session
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn WorkspaceStore>) -> Self {
        Self {
            api,
            store,
            session: None,
            messages: Vec::new(),
            in_flight: false,
        }
    }

    /// The currently active session, if any
    pub fn active_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The displayed message list, in chronological order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a send is currently in flight
    pub fn is_sending(&self) -> bool {
        self.in_flight
    }

    /// Switch to a session with an already-fetched message history.
    ///
    /// Pure state transition: any send still pending for the previous
    /// session loses interest in this controller; its late outcome
    /// will be discarded by `complete_send`.
    pub fn activate(&mut self, session: Session, messages: Vec<Message>) {
        self.session = Some(session);
        self.messages = messages;
    }

    /// Fetch a session and its messages, then switch to it
    pub fn open_session(&mut self, id: &SessionId) -> Result<()> {
        let session = self.api.get_session(id);
        let session = self.guard(session)?;
        let messages = self.api.list_messages(id);
        let messages = self.guard(messages)?;
        self.activate(session, messages);
        Ok(())
    }

    /// Clear all controller state (session switch-out or logout)
    pub fn reset(&mut self) {
        self.session = None;
        self.messages.clear();
        self.in_flight = false;
    }

    /// An authorization failure ends the session globally; the stale
    /// message list must not outlive it.
    fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result
            && err.is_unauthorized()
        {
            self.reset();
        }
        result
    }

    /// Start a send: validate, append the optimistic user message,
    /// and capture its temporary id.
    ///
    /// Empty or whitespace-only content is rejected without touching
    /// the message list or the network. A second send while one is in
    /// flight is rejected; sends are serialized per controller.
    pub fn begin_send(&mut self, content: &str) -> Result<PendingSend> {
        let session_id = self
            .session
            .as_ref()
            .map(|s| s.id.clone())
            .ok_or_else(|| Error::Validation("no active session".to_string()))?;

        let content = content.trim();
        if content.is_empty() {
            return Err(Error::Validation("message is empty".to_string()));
        }
        if self.in_flight {
            return Err(Error::Validation("a send is already in flight".to_string()));
        }

        let message = Message::pending_user(session_id.clone(), content);
        let temp_id = message.id.clone();
        self.messages.push(message);
        self.in_flight = true;

        Ok(PendingSend {
            temp_id,
            session_id,
            content: content.to_string(),
        })
    }

    /// Finish a send by reconciling the backend outcome.
    ///
    /// On success the temporary message is replaced by the confirmed
    /// user message and the assistant reply, in append order, and the
    /// session's last-message metadata is recorded. On failure the
    /// temporary message is removed so the list equals the pre-send
    /// list. If the active session changed while the send was in
    /// flight, the outcome is discarded entirely.
    pub fn complete_send(
        &mut self,
        pending: PendingSend,
        outcome: Result<SendMessageResponse>,
    ) -> Result<()> {
        self.in_flight = false;

        let still_active = self
            .session
            .as_ref()
            .is_some_and(|s| s.id == pending.session_id);
        if !still_active {
            info!(
                "discarding send outcome for inactive session {}",
                pending.session_id.as_str()
            );
            return Ok(());
        }

        // Remove by the exact captured id, success or failure
        self.messages.retain(|m| m.id != pending.temp_id);

        let response = self.guard(outcome)?;
        self.store
            .record_last_message(&pending.session_id, &response.ai_message.content)?;
        self.messages.push(response.user_message);
        self.messages.push(response.ai_message);
        Ok(())
    }

    /// Send a message to the active session and wait for the reply
    pub fn send_message(&mut self, content: &str) -> Result<()> {
        let pending = self.begin_send(content)?;
        let outcome = self
            .api
            .send_message(&pending.session_id, &pending.content);
        self.complete_send(pending, outcome)
    }

    /// Rename the active session
    pub fn rename(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("session name is required".to_string()));
        }
        let Some(id) = self.session.as_ref().map(|s| s.id.clone()) else {
            return Err(Error::Validation("no active session".to_string()));
        };

        let result = self.api.update_session(
            &id,
            &UpdateSessionRequest {
                name: Some(name.to_string()),
                folder_id: None,
            },
        );
        self.guard(result)?;

        if let Some(session) = self.session.as_mut() {
            session.name = name.to_string();
            self.store.upsert_session(session.clone())?;
        }
        Ok(())
    }

    /// Delete the active session and clear the controller.
    ///
    /// Irreversible; the embedding UI must confirm with the user
    /// before calling this.
    pub fn delete(&mut self) -> Result<()> {
        let Some(id) = self.session.as_ref().map(|s| s.id.clone()) else {
            return Err(Error::Validation("no active session".to_string()));
        };

        let result = self.api.delete_session(&id);
        self.guard(result)?;
        self.store.remove_session(&id)?;
        info!("deleted session {}", id.as_str());
        self.reset();
        Ok(())
    }

    /// Render the message list as a markdown transcript.
    ///
    /// Pure local transformation; returns None when there is no
    /// active session or no messages to export.
    pub fn export_transcript(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        if self.messages.is_empty() {
            return None;
        }

        let mut transcript = format!("# {}\n\n", session.name);
        transcript.push_str(&format!(
            "Date: {}\n\n",
            chrono::Utc::now().format("%Y-%m-%d")
        ));
        for message in &self.messages {
            let speaker = if message.is_user { "You" } else { "AI" };
            transcript.push_str(&format!("## {}\n\n{}\n\n", speaker, message.content));
        }
        Some(transcript)
    }
}
