//! Error types for SOOON.

use thiserror::Error;

/// Common error type for SOOON.
#[derive(Error, Debug)]
pub enum SooonError {
    /// Database error.
    ///
    /// Errors from sqlx are converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (bad credentials, unknown account).
    #[error("authentication error: {0}")]
    Auth(String),

    /// The caller is authenticated but has no rights over the target entity.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Duplicate state, e.g. liking a post twice.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unrecognized argument value, e.g. an unknown sort key.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for SooonError {
    fn from(e: sqlx::Error) -> Self {
        SooonError::Database(e.to_string())
    }
}

/// Returns true if the sqlx error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Result type alias for SOOON operations.
pub type Result<T> = std::result::Result<T, SooonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = SooonError::Auth("invalid password".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid password");
    }

    #[test]
    fn test_permission_error_display() {
        let err = SooonError::PermissionDenied("not the author".to_string());
        assert_eq!(err.to_string(), "permission denied: not the author");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = SooonError::NotFound("post".to_string());
        assert_eq!(err.to_string(), "post not found");
    }

    #[test]
    fn test_conflict_error_display() {
        let err = SooonError::Conflict("already liked".to_string());
        assert_eq!(err.to_string(), "conflict: already liked");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = SooonError::InvalidArgument("no such sort key: bogus".to_string());
        assert_eq!(err.to_string(), "invalid argument: no such sort key: bogus");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SooonError = io_err.into();
        assert!(matches!(err, SooonError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: SooonError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, SooonError::Database(_)));
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
