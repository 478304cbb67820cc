//! Error types used throughout the application

use cipherlog_common::{CommonError, CryptoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Cipherlog
///
/// `Decryption` is kept apart from every other failure so callers can tell
/// "wrong passphrase or tampered data" from "nothing stored yet" (which is
/// `Ok(None)` or an empty list, never an error).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CipherlogError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Cipherlog operations
pub type Result<T> = std::result::Result<T, CipherlogError>;

impl CipherlogError {
    /// True for authentication/parse failures of a ciphertext
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }

    /// Short stable label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Decryption(_) => "decryption",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<CryptoError> for CipherlogError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidInput(message) => Self::InvalidInput(message),
            CryptoError::Decryption(message) => Self::Decryption(message),
            CryptoError::Encryption(message) => Self::Internal(message),
            CryptoError::Common(common) => common.into(),
        }
    }
}

impl From<CommonError> for CipherlogError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::Config { .. } => Self::Config(err.to_string()),
            CommonError::Validation { .. } => Self::InvalidInput(err.to_string()),
            CommonError::Storage { .. } => Self::Storage(err.to_string()),
            CommonError::Serialization { .. }
            | CommonError::NotFound { .. }
            | CommonError::Internal { .. } => Self::Internal(err.to_string()),
        }
    }
}
