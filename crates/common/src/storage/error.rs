//! Storage error types
//!
//! Defines error types for the storage layer, integrating with the common
//! error system.

use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(String),

    #[error("Database schema error: {0}")]
    Schema(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Common(#[from] crate::CommonError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Rusqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

impl ErrorClassification for StorageError {
    /// Retryable errors are transient SQLite lock conflicts
    fn is_retryable(&self) -> bool {
        match self {
            Self::Rusqlite(err) => matches!(
                err.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked)
            ),
            Self::Common(common_err) => common_err.is_retryable(),
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Connection(_) => ErrorSeverity::Error,
            Self::Query(_) => ErrorSeverity::Error,
            Self::Schema(_) => ErrorSeverity::Critical,
            Self::InvalidConfig(_) => ErrorSeverity::Error,
            Self::Common(common_err) => common_err.severity(),
            Self::Io(_) => ErrorSeverity::Error,
            Self::Rusqlite(_) if self.is_retryable() => ErrorSeverity::Warning,
            Self::Rusqlite(_) => ErrorSeverity::Error,
            Self::SerdeJson(_) => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Schema(_)) || matches!(self, Self::Common(err) if err.is_critical())
    }

    fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Self::Common(common_err) => common_err.retry_after(),
            _ => None,
        }
    }
}

impl StorageError {
    /// Add operation context to the error
    pub fn with_operation(self, operation: impl Into<String>) -> Self {
        let operation = operation.into();
        Self::Common(crate::CommonError::Storage {
            message: self.to_string(),
            operation: Some(operation),
        })
    }
}

/// Convert StorageError to CommonError for integration
impl From<StorageError> for crate::CommonError {
    fn from(err: StorageError) -> Self {
        if let StorageError::Common(common_err) = err {
            return common_err;
        }

        crate::CommonError::Storage { message: err.to_string(), operation: None }
    }
}
