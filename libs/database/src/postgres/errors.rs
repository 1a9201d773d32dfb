use sea_orm::{DbErr, SqlErr};

/// Storage failures the domain layer knows how to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbFailure {
    /// SQLSTATE 23505
    UniqueViolation(String),
    /// SQLSTATE 23503
    ForeignKeyViolation(String),
    /// SQLSTATE 22P02, e.g. a malformed uuid literal
    InvalidTextRepresentation(String),
    Other,
}

const UNIQUE_MARKERS: [&str; 2] = ["duplicate key value", "unique constraint"];
const FOREIGN_KEY_MARKER: &str = "violates foreign key constraint";
const INVALID_TEXT_MARKER: &str = "invalid input syntax for type";

/// Map a [`DbErr`] onto the constraint it tripped, if any.
///
/// The driver's structured SQL error is preferred. Message matching covers
/// errors that reach us already stringified (raw statements, mocks).
pub fn classify(err: &DbErr) -> DbFailure {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => return DbFailure::UniqueViolation(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            return DbFailure::ForeignKeyViolation(detail);
        }
        _ => {}
    }

    let message = err.to_string();
    let lowered = message.to_lowercase();

    if UNIQUE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        DbFailure::UniqueViolation(message)
    } else if lowered.contains(FOREIGN_KEY_MARKER) {
        DbFailure::ForeignKeyViolation(message)
    } else if lowered.contains(INVALID_TEXT_MARKER) {
        DbFailure::InvalidTextRepresentation(message)
    } else {
        DbFailure::Other
    }
}
