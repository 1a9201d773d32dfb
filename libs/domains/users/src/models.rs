use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A registered account. The hash never leaves this crate's service layer.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            username,
            password_hash,
            // Postgres keeps microseconds
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Usernames are stored in a Postgres text column, which cannot hold U+0000.
fn reject_nul(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        return Err(ValidationError::new("nul_character"));
    }
    Ok(())
}

/// Registration request
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64), custom(function = "reject_nul"))]
    #[schema(example = "alice", min_length = 3, max_length = 64)]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    #[schema(min_length = 8, max_length = 128)]
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login request
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64), custom(function = "reject_nul"))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Bearer token issued on login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_bounds() {
        let ok = RegisterRequest {
            username: "bob".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_name = RegisterRequest {
            username: "bo".to_string(),
            ..ok.clone()
        };
        assert!(short_name.validate().is_err());

        let short_password = RegisterRequest {
            password: "1234567".to_string(),
            ..ok.clone()
        };
        assert!(short_password.validate().is_err());

        let long_password = RegisterRequest {
            password: "x".repeat(129),
            ..ok
        };
        assert!(long_password.validate().is_err());
    }

    #[test]
    fn test_usernames_with_nul_are_invalid() {
        let register = RegisterRequest {
            username: "bob\0".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(register.validate().is_err());

        let login = LoginRequest {
            username: "\0".to_string(),
            password: "whatever".to_string(),
        };
        let errors = login.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let user = User::new("carol".to_string(), "$argon2id$v=19$secret".to_string());
        assert!(!format!("{user:?}").contains("argon2"));

        let login = LoginRequest {
            username: "carol".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(!format!("{login:?}").contains("hunter22"));
    }

    #[test]
    fn test_response_drops_hash() {
        let user = User::new("dave".to_string(), "hash".to_string());
        let json = serde_json::to_value(UserResponse::from(user.clone())).unwrap();

        assert_eq!(json["username"], "dave");
        assert_eq!(json["id"], user.id.to_string());
        assert!(json.get("password_hash").is_none());
    }
}
