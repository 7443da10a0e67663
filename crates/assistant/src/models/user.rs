//! User model for the authenticated account

use serde::{Deserialize, Serialize};

/// The authenticated user, as returned by the profile endpoint
///
/// Held by the auth manager for the lifetime of a login; dropped on
/// logout. A login response only carries the email, so `id` may be
/// empty until the next profile fetch fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

impl User {
    /// Create a minimal user from a login response (profile not yet fetched)
    pub fn from_login(email: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            email: email.into(),
            name: None,
            is_verified: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_login() {
        let user = User::from_login("a@b.com");
        assert_eq!(user.email, "a@b.com");
        assert!(user.id.is_empty());
        assert!(user.name.is_none());
    }

    #[test]
    fn test_profile_deserialization() {
        let json = r#"{"id":"u1","email":"a@b.com","name":"Ana","isVerified":true}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.name.as_deref(), Some("Ana"));
        assert_eq!(user.is_verified, Some(true));
    }
}
