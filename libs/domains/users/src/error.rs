use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User {0} already registered.")]
    UsernameTaken(String),

    /// Same message for an unknown user and a wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Metric label for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            UserError::NotFound(_) => "not_found",
            UserError::UsernameTaken(_) => "conflict",
            UserError::InvalidCredentials => "invalid_credentials",
            UserError::Validation(_) => "validation",
            UserError::PasswordHash(_) | UserError::Token(_) | UserError::Internal(_) => "internal",
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound(err.to_string()),
            UserError::UsernameTaken(_) => AppError::Conflict(err.to_string()),
            UserError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            UserError::Validation(e) => AppError::ValidationError(e),
            UserError::PasswordHash(msg) | UserError::Token(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_helpers::ErrorCode;

    #[test]
    fn test_username_taken_is_conflict() {
        let app: AppError = UserError::UsernameTaken("alice".into()).into();
        assert_eq!(app.status(), StatusCode::CONFLICT);
        assert_eq!(app.error_code(), ErrorCode::Conflict);
        assert_eq!(app.to_string(), "Conflict: User alice already registered.");
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        let app: AppError = UserError::InvalidCredentials.into();
        assert_eq!(app.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_hashing_failures_are_internal() {
        let app: AppError = UserError::PasswordHash("salt".into()).into();
        assert_eq!(app.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(UserError::Token("x".into()).kind(), "internal");
    }
}
