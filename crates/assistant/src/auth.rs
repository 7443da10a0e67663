//! Authentication session management
//!
//! Owns the current user, the persisted bearer token, and a single
//! transient error slot reflecting the most recent failed operation.
//! `is_authenticated` is derived strictly from user presence: a stale
//! token on disk without a successful profile fetch does not count.
//!
//! The manager registers an unauthorized hook on the API client at
//! construction, so a 401 observed by any component sharing the
//! client (workspace handler, chat controller) drops the user and the
//! stored token, not just the client's in-memory token slot.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::api::types::SignupRequest;
use crate::error::{Error, Result};
use crate::models::User;

/// Token filename in the nightprep config directory
const TOKEN_FILE: &str = "auth-token.json";

/// Stored token data
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Session state shared with the client's unauthorized hook
struct AuthState {
    token_path: PathBuf,
    user: RwLock<Option<User>>,
    error: RwLock<Option<String>>,
}

impl AuthState {
    /// Drop the user and the stored token file
    fn drop_session(&self) {
        if self.token_path.exists()
            && let Err(e) = fs::remove_file(&self.token_path)
        {
            warn!("failed to remove stored token: {}", e);
        }
        *self.user.write().unwrap() = None;
    }
}

/// Manages the login/registration/verification token lifecycle
pub struct AuthManager {
    api: Arc<ApiClient>,
    state: Arc<AuthState>,
}

impl AuthManager {
    /// Create an auth manager using the default token path
    pub fn new(api: Arc<ApiClient>) -> anyhow::Result<Self> {
        let token_path = config::config_path(TOKEN_FILE)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(Self::with_token_path(api, token_path))
    }

    /// Create an auth manager with an explicit token path (tests)
    pub fn with_token_path(api: Arc<ApiClient>, token_path: PathBuf) -> Self {
        let state = Arc::new(AuthState {
            token_path,
            user: RwLock::new(None),
            error: RwLock::new(None),
        });

        // Any 401, from any endpoint, ends the session
        let hook_state = state.clone();
        api.on_unauthorized(move || {
            info!("authorization failure, dropping session");
            hook_state.drop_session();
        });

        Self { api, state }
    }

    // === State accessors ===

    /// Whether a user is currently held
    pub fn is_authenticated(&self) -> bool {
        self.state.user.read().unwrap().is_some()
    }

    /// The current user, if authenticated
    pub fn current_user(&self) -> Option<User> {
        self.state.user.read().unwrap().clone()
    }

    /// The message of the most recent failed operation, if any
    pub fn last_error(&self) -> Option<String> {
        self.state.error.read().unwrap().clone()
    }

    /// Clear the transient error slot
    pub fn clear_error(&self) {
        *self.state.error.write().unwrap() = None;
    }

    /// Record an operation outcome in the error slot
    ///
    /// An `Unauthorized` failure additionally forces a logout,
    /// regardless of which operation triggered it.
    fn note<T>(&self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.clear_error(),
            Err(err) => {
                if err.is_unauthorized() {
                    self.force_logout();
                }
                *self.state.error.write().unwrap() = Some(err.display_message());
            }
        }
        result
    }

    // === Startup ===

    /// Resolve the Unknown startup state.
    ///
    /// Loads the stored token and fetches the profile. Returns true if
    /// the session was restored; on any failure the token is discarded
    /// and the state is unauthenticated. Never touches the error slot:
    /// an expired token at startup is not a user-facing failure.
    pub fn resume(&self) -> bool {
        let Ok(stored) = self.load_token() else {
            return false;
        };

        self.api.set_token(&stored.token);

        match self.api.get_profile() {
            Ok(user) => {
                info!("restored session for {}", user.email);
                *self.state.user.write().unwrap() = Some(user);
                true
            }
            Err(err) => {
                warn!("stored token rejected, discarding: {}", err);
                self.force_logout();
                false
            }
        }
    }

    // === Operations ===

    /// Log in with email and password
    pub fn login(&self, email: &str, password: &str) -> Result<()> {
        let result = (|| {
            validate_email(email)?;
            if password.is_empty() {
                return Err(Error::Validation("password is required".to_string()));
            }

            let response = self.api.login(email, password)?;
            self.save_token(&response.token)?;
            self.api.set_token(&response.token);

            // The login response only carries the email; the profile
            // fetch on the next resume fills in the rest.
            *self.state.user.write().unwrap() = Some(User::from_login(&response.email));
            info!("logged in as {}", response.email);
            Ok(())
        })();
        self.note(result)
    }

    /// Register a new account. Does not log in.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
        name: Option<&str>,
    ) -> Result<()> {
        let result = (|| {
            validate_email(email)?;
            if password.len() < 8 {
                return Err(Error::Validation(
                    "password must be at least 8 characters".to_string(),
                ));
            }
            if password != confirm_password {
                return Err(Error::Validation("passwords do not match".to_string()));
            }

            self.api.signup(&SignupRequest {
                email: email.to_string(),
                password: password.to_string(),
                password1: confirm_password.to_string(),
                first_name: name.map(str::to_string),
            })?;
            info!("registered account for {}", email);
            Ok(())
        })();
        self.note(result)
    }

    /// Log out and clear the persisted token
    pub fn logout(&self) -> Result<()> {
        let result = (|| {
            if self.state.token_path.exists() {
                fs::remove_file(&self.state.token_path).map_err(|e| {
                    Error::Validation(format!("failed to remove stored token: {}", e))
                })?;
            }
            self.api.clear_token();
            *self.state.user.write().unwrap() = None;
            info!("logged out");
            Ok(())
        })();
        self.note(result)
    }

    /// Request a password-reset email
    pub fn request_password_reset(&self, email: &str) -> Result<()> {
        let result = (|| {
            validate_email(email)?;
            self.api.forgot_password(email)
        })();
        self.note(result)
    }

    /// Verify the OTP received for password recovery
    pub fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<()> {
        let result = (|| {
            validate_email(email)?;
            if otp.trim().is_empty() {
                return Err(Error::Validation("OTP is required".to_string()));
            }
            self.api.verify_reset_otp(email, otp.trim())
        })();
        self.note(result)
    }

    /// Set a new password using a reset token
    pub fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        let result = (|| {
            if token.trim().is_empty() {
                return Err(Error::Validation("reset token is required".to_string()));
            }
            if password.len() < 8 {
                return Err(Error::Validation(
                    "password must be at least 8 characters".to_string(),
                ));
            }
            self.api.reset_password(token.trim(), password)
        })();
        self.note(result)
    }

    /// Send a verification OTP to the logged-in user's email
    pub fn send_verification_email(&self) -> Result<()> {
        let result = self.api.send_verification_otp();
        self.note(result)
    }

    /// Verify the account email with an OTP, then refresh the profile
    pub fn verify_email(&self, otp: &str) -> Result<()> {
        let result = (|| {
            if otp.trim().is_empty() {
                return Err(Error::Validation("OTP is required".to_string()));
            }
            self.api.verify_user(otp.trim())?;

            let user = self.api.get_profile()?;
            *self.state.user.write().unwrap() = Some(user);
            Ok(())
        })();
        self.note(result)
    }

    /// Drop all auth state without a user-initiated logout.
    ///
    /// Also runs via the unauthorized hook when any response carries
    /// an authorization failure.
    pub fn force_logout(&self) {
        self.state.drop_session();
        self.api.clear_token();
    }

    // === Token persistence ===

    fn load_token(&self) -> anyhow::Result<StoredToken> {
        let content = fs::read_to_string(&self.state.token_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_token(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.state.token_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Network(format!("failed to create config dir: {}", e)))?;
        }
        let stored = StoredToken {
            token: token.to_string(),
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|e| Error::Network(format!("failed to encode token: {}", e)))?;
        fs::write(&self.state.token_path, content)
            .map_err(|e| Error::Network(format!("failed to store token: {}", e)))?;
        Ok(())
    }
}

/// Basic client-side email check; full validation is the server's job
fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::Validation("email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(Error::Validation("email address is invalid".to_string()));
    }
    Ok(())
}
