//! Common error types and utilities
//!
//! This module provides the error infrastructure shared by every Cipherlog
//! crate. It is built on three pieces:
//!
//! 1. **`CommonError`**: error patterns that appear across modules
//!    (configuration, serialization, validation, storage, internal faults).
//!
//! 2. **`ErrorClassification` trait**: a standard interface for classifying
//!    errors by retryability, severity, and criticality.
//!
//! 3. **`ErrorSeverity` enum**: a unified severity scale for logging.
//!
//! Module-specific errors (`CryptoError`, `StorageError`) **compose** with
//! `CommonError` rather than duplicating its variants:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum StorageError {
//!     #[error("Database query error: {0}")]
//!     Query(String),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//! ```
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Resource not found |
//! | **Warning** | Degraded but operational | Lock contention |
//! | **Error** | Failure requiring attention | Invalid input, config errors |
//! | **Critical** | Integrity at risk | Failed authentication of ciphertext |

use std::fmt;
use std::time::Duration;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Common error variants that appear across multiple modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Configuration-related errors
    Config { message: String, field: Option<String> },

    /// Serialization or deserialization errors
    Serialization { message: String, format: Option<String> },

    /// Validation errors
    Validation { field: String, message: String },

    /// Resource not found errors
    NotFound { resource_type: String, identifier: Option<String> },

    /// Storage/database errors
    Storage { message: String, operation: Option<String> },

    /// Internal errors that shouldn't normally occur
    Internal { message: String, context: Option<String> },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { message, field } => {
                if let Some(field) = field {
                    write!(f, "Configuration error in field '{}': {}", field, message)
                } else {
                    write!(f, "Configuration error: {}", message)
                }
            }
            Self::Serialization { message, format } => {
                if let Some(format) = format {
                    write!(f, "Serialization error ({}): {}", format, message)
                } else {
                    write!(f, "Serialization error: {}", message)
                }
            }
            Self::Validation { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            Self::NotFound { resource_type, identifier } => {
                if let Some(id) = identifier {
                    write!(f, "{} not found: '{}'", resource_type, id)
                } else {
                    write!(f, "{} not found", resource_type)
                }
            }
            Self::Storage { message, operation } => {
                if let Some(op) = operation {
                    write!(f, "Storage error during '{}': {}", op, message)
                } else {
                    write!(f, "Storage error: {}", message)
                }
            }
            Self::Internal { message, context } => {
                if let Some(ctx) = context {
                    write!(f, "Internal error in '{}': {}", ctx, message)
                } else {
                    write!(f, "Internal error: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config { .. } => ErrorSeverity::Error,
            Self::Serialization { .. } => ErrorSeverity::Error,
            Self::Validation { .. } => ErrorSeverity::Error,
            Self::NotFound { .. } => ErrorSeverity::Info,
            Self::Storage { .. } => ErrorSeverity::Error,
            Self::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl CommonError {
    /// Create a simple configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), field: None }
    }

    /// Create a configuration error for a specific field
    pub fn config_field<S: Into<String>, F: Into<String>>(field: F, message: S) -> Self {
        Self::Config { message: message.into(), field: Some(field.into()) }
    }

    /// Create a simple serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization { message: message.into(), format: None }
    }

    /// Create a serialization error with format information
    pub fn serialization_format<S: Into<String>, F: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { message: message.into(), format: Some(format.into()) }
    }

    /// Create a validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create a not found error
    pub fn not_found<T: Into<String>>(resource_type: T) -> Self {
        Self::NotFound { resource_type: resource_type.into(), identifier: None }
    }

    /// Create a simple storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage { message: message.into(), operation: None }
    }

    /// Create a storage error for a specific operation
    pub fn storage_op<S: Into<String>, O: Into<String>>(operation: O, message: S) -> Self {
        Self::Storage { message: message.into(), operation: Some(operation.into()) }
    }

    /// Create a simple internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into(), context: None }
    }

    /// Create an internal error with context
    pub fn internal_with_context<S: Into<String>, C: Into<String>>(message: S, context: C) -> Self {
        Self::Internal { message: message.into(), context: Some(context.into()) }
    }
}

/// Standard interface for classifying errors
///
/// Every error type in the workspace implements this trait so that callers
/// can make uniform logging and handling decisions.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues (for example a locked database
    /// file) that may succeed if attempted again. Cipherlog itself never
    /// retries; the classification is advisory for callers.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    ///
    /// Critical errors typically indicate:
    /// - Tampered or undecryptable data
    /// - Internal invariant violations
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for logging decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_format("JSON", err.to_string())
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<toml::de::Error> for CommonError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization_format("TOML", err.to_string())
    }
}
