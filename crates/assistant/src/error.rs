//! Error types for the assistant engine

/// Errors surfaced by the assistant engine
///
/// `Validation` is always resolved locally and never follows a network
/// call. `Unauthorized` is special: any operation returning it causes
/// a forced logout at the service level.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client-side input check failed; no request was made
    #[error("validation failed: {0}")]
    Validation(String),

    /// The backend rejected credentials or an auth operation
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The stored token is expired or invalid (HTTP 401)
    #[error("session expired or token invalid")]
    Unauthorized,

    /// Transport failure or an unexpected non-2xx response
    #[error("network error: {0}")]
    Network(String),

    /// The backend rejected an uploaded file
    #[error("upload rejected: {0}")]
    Upload(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Human-readable message for display in an error slot
    pub fn display_message(&self) -> String {
        self.to_string()
    }

    /// Whether this error must trigger a global logout
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_detection() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert!(!Error::Network("down".into()).is_unauthorized());
    }

    #[test]
    fn test_display_message() {
        let err = Error::Validation("name is required".into());
        assert_eq!(err.display_message(), "validation failed: name is required");
    }
}
