use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::identity::OwnerId;
use crate::pagination::PageError;
use crate::repository::StoreError;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task with ID {0} not found")]
    NotFound(String),

    #[error("Invalid task ID format: {0}")]
    InvalidId(String),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("Invalid user reference: {0}")]
    InvalidReference(OwnerId),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Unrecognised store failure. Never shown to clients.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl TaskError {
    /// Metric label for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskError::NotFound(_) => "not_found",
            TaskError::InvalidId(_) => "invalid_format",
            TaskError::Page(e) if e.is_out_of_range() => "out_of_range",
            TaskError::Page(_) => "invalid_format",
            TaskError::InvalidReference(_) => "invalid_reference",
            TaskError::Validation(_) => "validation",
            TaskError::Internal(_) => "internal",
        }
    }

    /// Translation for calls that address a single task by id.
    pub(crate) fn from_store(err: StoreError, task_id: &str) -> Self {
        match err {
            StoreError::MalformedId(_) => TaskError::InvalidId(task_id.to_string()),
            StoreError::NotFound => TaskError::NotFound(task_id.to_string()),
            StoreError::ReferenceViolation(detail) | StoreError::Other(detail) => {
                TaskError::Internal(detail)
            }
        }
    }
}

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(_) => AppError::NotFound(err.to_string()),
            TaskError::InvalidId(_) => AppError::InvalidFormat(err.to_string()),
            TaskError::Page(e) if e.is_out_of_range() => AppError::OutOfRange(e.to_string()),
            TaskError::Page(e) => AppError::InvalidFormat(e.to_string()),
            TaskError::InvalidReference(_) => {
                AppError::InvalidReference("Invalid user reference".to_string())
            }
            TaskError::Validation(e) => AppError::ValidationError(e),
            TaskError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_helpers::ErrorCode;
    use uuid::Uuid;

    #[test]
    fn test_messages_carry_offending_value() {
        assert_eq!(
            TaskError::InvalidId("abc".into()).to_string(),
            "Invalid task ID format: abc"
        );
        assert_eq!(
            TaskError::NotFound("0192".into()).to_string(),
            "Task with ID 0192 not found"
        );
    }

    #[test]
    fn test_page_errors_split_by_kind() {
        let out: AppError = TaskError::from(PageError::PageExceeded { page: 4, max_page: 3 }).into();
        assert_eq!(out.error_code(), ErrorCode::OutOfRange);
        assert!(out.to_string().contains("maximum page 3"));

        let bad: AppError = TaskError::from(PageError::InvalidLimit(0)).into();
        assert_eq!(bad.error_code(), ErrorCode::InvalidFormat);
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors_translate_per_task() {
        let id = "not-a-uuid";
        assert!(matches!(
            TaskError::from_store(StoreError::MalformedId("x".into()), id),
            TaskError::InvalidId(ref v) if v == id
        ));
        assert!(matches!(
            TaskError::from_store(StoreError::NotFound, id),
            TaskError::NotFound(ref v) if v == id
        ));
        assert!(matches!(
            TaskError::from_store(StoreError::Other("boom".into()), id),
            TaskError::Internal(_)
        ));
    }

    #[test]
    fn test_reference_error_hides_storage_detail() {
        let app: AppError = TaskError::InvalidReference(OwnerId::new(Uuid::nil())).into();
        assert_eq!(app.error_code(), ErrorCode::InvalidReference);
        assert_eq!(app.to_string(), "Invalid reference: Invalid user reference");
    }
}
