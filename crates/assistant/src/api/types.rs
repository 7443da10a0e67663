//! Request and response payloads for the backend REST API
//!
//! Entity bodies use camelCase field names; the auth and
//! session-creation endpoints take snake_case request fields, spelled
//! out explicitly below.

use crate::models::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// POST /accounts/login
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: a bearer token plus the account email
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
}

/// POST /accounts/signup
#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    /// Password confirmation, echoed for server-side matching
    pub password1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

/// POST /accounts/forgot-password
#[derive(Debug, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /accounts/verify-otp-password-recovery
#[derive(Debug, Serialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// POST /accounts/reset-password
#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// POST /accounts/verify-user
#[derive(Debug, Serialize)]
pub struct VerifyEmailRequest {
    pub otp: String,
}

/// POST /session/sessions
#[derive(Debug, Serialize)]
pub struct CreateSessionRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

/// PUT /session/sessions/{id}
///
/// `folder_id` is tri-state: absent leaves the folder unchanged,
/// `Some(Some(id))` moves the session, `Some(None)` serializes an
/// explicit `null` to remove it from its folder.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Option<String>>,
}

/// POST /session/sessions/{id}/messages
#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Response to a message send: the persisted user message echo and
/// the assistant's reply, in append order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub user_message: Message,
    pub ai_message: Message,
}

/// POST /folders and PUT /folders/{id}
#[derive(Debug, Serialize)]
pub struct FolderRequest {
    pub name: String,
}

/// POST /pdf/{id}/ask
#[derive(Debug, Serialize)]
pub struct AskQuestionRequest {
    pub question: String,
}

/// Answer to a question asked about an uploaded document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnswer {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub document_id: String,
    pub created_at: DateTime<Utc>,
}
