//! Backend REST API HTTP client
//!
//! Covers the full surface consumed by the engine: accounts, chat
//! sessions and messages, folders, and PDF documents.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use std::sync::RwLock;

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::types::{
    AskQuestionRequest, CreateSessionRequest, DocumentAnswer, FolderRequest, ForgotPasswordRequest,
    LoginRequest, LoginResponse, ResetPasswordRequest, SendMessageRequest, SendMessageResponse,
    SignupRequest, UpdateSessionRequest, VerifyEmailRequest, VerifyOtpRequest,
};
use crate::error::{Error, Result};
use crate::models::{Document, DocumentId, Folder, FolderId, Message, Session, SessionId, User};

/// Callback invoked when any endpoint observes a 401
type UnauthorizedHook = Box<dyn Fn() + Send + Sync>;

/// HTTP client for the learning-assistant backend
///
/// Holds the bearer token for the current login. A 401 response from
/// any endpoint clears the token slot, fires the registered
/// unauthorized hooks, and surfaces [`Error::Unauthorized`]. The auth
/// manager and service register hooks so the session is torn down no
/// matter which operation hit the expired token.
pub struct ApiClient {
    base_url: String,
    token: RwLock<Option<String>>,
    unauthorized_hooks: RwLock<Vec<UnauthorizedHook>>,
}

impl ApiClient {
    /// Create a new client against the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::Validation(format!("invalid base URL '{}': {}", base_url, e)))?;

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            unauthorized_hooks: RwLock::new(Vec::new()),
        })
    }

    /// Register a callback to run whenever a 401 is observed.
    ///
    /// Hooks fire after the token slot has been cleared and must not
    /// issue requests through this client.
    pub fn on_unauthorized(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.unauthorized_hooks.write().unwrap().push(Box::new(hook));
    }

    pub(crate) fn notify_unauthorized(&self) {
        for hook in self.unauthorized_hooks.read().unwrap().iter() {
            hook();
        }
    }

    /// Set the bearer token attached to subsequent requests
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    /// Drop the bearer token
    pub fn clear_token(&self) {
        *self.token.write().unwrap() = None;
    }

    /// Whether a bearer token is currently held
    pub fn has_token(&self) -> bool {
        self.token.read().unwrap().is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authorization header value, or Unauthorized if no token is held
    fn bearer(&self) -> Result<String> {
        self.token
            .read()
            .unwrap()
            .as_ref()
            .map(|t| format!("Bearer {}", t))
            .ok_or(Error::Unauthorized)
    }

    /// Map a ureq error for an authenticated endpoint
    ///
    /// 401 clears the token slot so a stale token is never reused,
    /// then fires the unauthorized hooks.
    fn map_err(&self, err: ureq::Error, what: &str) -> Error {
        match err {
            ureq::Error::StatusCode(401) => {
                debug!("{} returned 401, dropping token", what);
                self.clear_token();
                self.notify_unauthorized();
                Error::Unauthorized
            }
            ureq::Error::StatusCode(code) => {
                Error::Network(format!("{} failed with status {}", what, code))
            }
            other => Error::Network(format!("{} failed: {}", what, other)),
        }
    }

    fn parse<T: DeserializeOwned>(mut response: ureq::http::Response<ureq::Body>, what: &str) -> Result<T> {
        response
            .body_mut()
            .read_json()
            .map_err(|e| Error::Network(format!("failed to parse {} response: {}", what, e)))
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B, what: &str) -> Result<T> {
        let response = ureq::post(self.endpoint(path))
            .header("Authorization", &self.bearer()?)
            .send_json(body)
            .map_err(|e| self.map_err(e, what))?;
        Self::parse(response, what)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let response = ureq::get(self.endpoint(path))
            .header("Authorization", &self.bearer()?)
            .call()
            .map_err(|e| self.map_err(e, what))?;
        Self::parse(response, what)
    }

    // === Accounts ===

    /// POST /accounts/login
    ///
    /// A 401 here means bad credentials, not an expired session, so it
    /// maps to `Auth` rather than `Unauthorized`.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = ureq::post(self.endpoint("/accounts/login"))
            .send_json(&body)
            .map_err(|e| match e {
                ureq::Error::StatusCode(400 | 401) => {
                    Error::Auth("invalid email or password".to_string())
                }
                other => Error::Network(format!("login failed: {}", other)),
            })?;
        Self::parse(response, "login")
    }

    /// POST /accounts/signup
    pub fn signup(&self, request: &SignupRequest) -> Result<()> {
        ureq::post(self.endpoint("/accounts/signup"))
            .send_json(request)
            .map_err(|e| match e {
                ureq::Error::StatusCode(code @ 400..=499) => {
                    Error::Auth(format!("registration rejected (status {})", code))
                }
                other => Error::Network(format!("signup failed: {}", other)),
            })?;
        Ok(())
    }

    /// POST /accounts/forgot-password
    pub fn forgot_password(&self, email: &str) -> Result<()> {
        ureq::post(self.endpoint("/accounts/forgot-password"))
            .send_json(&ForgotPasswordRequest {
                email: email.to_string(),
            })
            .map_err(|e| match e {
                ureq::Error::StatusCode(code @ 400..=499) => {
                    Error::Auth(format!("password reset request rejected (status {})", code))
                }
                other => Error::Network(format!("forgot-password failed: {}", other)),
            })?;
        Ok(())
    }

    /// POST /accounts/verify-otp-password-recovery
    pub fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<()> {
        ureq::post(self.endpoint("/accounts/verify-otp-password-recovery"))
            .send_json(&VerifyOtpRequest {
                email: email.to_string(),
                otp: otp.to_string(),
            })
            .map_err(|e| match e {
                ureq::Error::StatusCode(400..=499) => Error::Auth("invalid OTP".to_string()),
                other => Error::Network(format!("OTP verification failed: {}", other)),
            })?;
        Ok(())
    }

    /// POST /accounts/reset-password
    pub fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        ureq::post(self.endpoint("/accounts/reset-password"))
            .send_json(&ResetPasswordRequest {
                token: token.to_string(),
                password: password.to_string(),
            })
            .map_err(|e| match e {
                ureq::Error::StatusCode(code @ 400..=499) => {
                    Error::Auth(format!("password reset rejected (status {})", code))
                }
                other => Error::Network(format!("reset-password failed: {}", other)),
            })?;
        Ok(())
    }

    /// POST /accounts/send-verification-otp
    pub fn send_verification_otp(&self) -> Result<()> {
        ureq::post(self.endpoint("/accounts/send-verification-otp"))
            .header("Authorization", &self.bearer()?)
            .send_json(&serde_json::json!({}))
            .map_err(|e| self.map_err(e, "send verification OTP"))?;
        Ok(())
    }

    /// POST /accounts/verify-user
    pub fn verify_user(&self, otp: &str) -> Result<()> {
        ureq::post(self.endpoint("/accounts/verify-user"))
            .header("Authorization", &self.bearer()?)
            .send_json(&VerifyEmailRequest {
                otp: otp.to_string(),
            })
            .map_err(|e| self.map_err(e, "email verification"))?;
        Ok(())
    }

    /// GET /user/profile
    pub fn get_profile(&self) -> Result<User> {
        self.get_json("/user/profile", "profile")
    }

    // === Sessions ===

    /// POST /session/sessions
    pub fn create_session(&self, name: &str, folder_id: Option<&FolderId>) -> Result<Session> {
        let body = CreateSessionRequest {
            name: name.to_string(),
            folder_id: folder_id.map(|f| f.0.clone()),
        };
        self.post_json("/session/sessions", &body, "create session")
    }

    /// GET /session/sessions
    pub fn list_sessions(&self) -> Result<Vec<Session>> {
        self.get_json("/session/sessions", "list sessions")
    }

    /// GET /session/sessions/{id}
    pub fn get_session(&self, id: &SessionId) -> Result<Session> {
        let path = format!("/session/sessions/{}", urlencoding::encode(id.as_str()));
        self.get_json(&path, "get session")
    }

    /// PUT /session/sessions/{id}
    pub fn update_session(&self, id: &SessionId, request: &UpdateSessionRequest) -> Result<()> {
        let path = format!("/session/sessions/{}", urlencoding::encode(id.as_str()));
        ureq::put(self.endpoint(&path))
            .header("Authorization", &self.bearer()?)
            .send_json(request)
            .map_err(|e| self.map_err(e, "update session"))?;
        Ok(())
    }

    /// DELETE /session/sessions/{id}
    pub fn delete_session(&self, id: &SessionId) -> Result<()> {
        let path = format!("/session/sessions/{}", urlencoding::encode(id.as_str()));
        ureq::delete(self.endpoint(&path))
            .header("Authorization", &self.bearer()?)
            .call()
            .map_err(|e| self.map_err(e, "delete session"))?;
        Ok(())
    }

    /// GET /session/sessions/{id}/messages
    pub fn list_messages(&self, id: &SessionId) -> Result<Vec<Message>> {
        let path = format!(
            "/session/sessions/{}/messages",
            urlencoding::encode(id.as_str())
        );
        self.get_json(&path, "list messages")
    }

    /// POST /session/sessions/{id}/messages
    pub fn send_message(&self, id: &SessionId, content: &str) -> Result<SendMessageResponse> {
        let path = format!(
            "/session/sessions/{}/messages",
            urlencoding::encode(id.as_str())
        );
        let body = SendMessageRequest {
            content: content.to_string(),
        };
        self.post_json(&path, &body, "send message")
    }

    // === Folders ===

    /// POST /folders
    pub fn create_folder(&self, name: &str) -> Result<Folder> {
        let body = FolderRequest {
            name: name.to_string(),
        };
        self.post_json("/folders", &body, "create folder")
    }

    /// GET /folders
    pub fn list_folders(&self) -> Result<Vec<Folder>> {
        self.get_json("/folders", "list folders")
    }

    /// PUT /folders/{id}
    pub fn update_folder(&self, id: &FolderId, name: &str) -> Result<()> {
        let path = format!("/folders/{}", urlencoding::encode(id.as_str()));
        ureq::put(self.endpoint(&path))
            .header("Authorization", &self.bearer()?)
            .send_json(&FolderRequest {
                name: name.to_string(),
            })
            .map_err(|e| self.map_err(e, "update folder"))?;
        Ok(())
    }

    /// DELETE /folders/{id}
    pub fn delete_folder(&self, id: &FolderId) -> Result<()> {
        let path = format!("/folders/{}", urlencoding::encode(id.as_str()));
        ureq::delete(self.endpoint(&path))
            .header("Authorization", &self.bearer()?)
            .call()
            .map_err(|e| self.map_err(e, "delete folder"))?;
        Ok(())
    }

    // === Documents ===

    /// POST /pdf/upload (multipart)
    ///
    /// The body is assembled by hand; a client-side rejection never
    /// happens here (the caller validates the file), and a 4xx from
    /// the server maps to `Upload`.
    pub fn upload_document(&self, file_name: &str, bytes: &[u8]) -> Result<Document> {
        let bearer = self.bearer()?;
        let boundary = multipart_boundary();
        let body = multipart_file_body(&boundary, file_name, bytes);

        let response = ureq::post(self.endpoint("/pdf/upload"))
            .header("Authorization", &bearer)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", boundary),
            )
            .send(&body[..])
            .map_err(|e| match e {
                ureq::Error::StatusCode(401) => {
                    self.clear_token();
                    self.notify_unauthorized();
                    Error::Unauthorized
                }
                ureq::Error::StatusCode(code @ 400..=499) => {
                    Error::Upload(format!("server rejected the file (status {})", code))
                }
                other => Error::Network(format!("upload failed: {}", other)),
            })?;
        Self::parse(response, "upload")
    }

    /// GET /pdf/list
    pub fn list_documents(&self) -> Result<Vec<Document>> {
        self.get_json("/pdf/list", "list documents")
    }

    /// DELETE /pdf/{id}
    pub fn delete_document(&self, id: &DocumentId) -> Result<()> {
        let path = format!("/pdf/{}", urlencoding::encode(id.as_str()));
        ureq::delete(self.endpoint(&path))
            .header("Authorization", &self.bearer()?)
            .call()
            .map_err(|e| self.map_err(e, "delete document"))?;
        Ok(())
    }

    /// POST /pdf/{id}/ask
    pub fn ask_document(&self, id: &DocumentId, question: &str) -> Result<DocumentAnswer> {
        let path = format!("/pdf/{}/ask", urlencoding::encode(id.as_str()));
        let body = AskQuestionRequest {
            question: question.to_string(),
        };
        self.post_json(&path, &body, "ask document")
    }
}

/// Generate a boundary unlikely to collide with file content
fn multipart_boundary() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let hasher = RandomState::new().build_hasher();
    format!("----nightprep{:016x}", hasher.finish())
}

/// Assemble a single-file multipart/form-data body
fn multipart_file_body(boundary: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
            boundary, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
