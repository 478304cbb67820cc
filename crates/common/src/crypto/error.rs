//! Crypto error types

use std::time::Duration;

use thiserror::Error;

use crate::error::{CommonError, ErrorClassification, ErrorSeverity};

/// Crypto error type
///
/// `Decryption` is deliberately coarse: a wrong key, a flipped bit, a
/// truncated envelope and a plaintext that is not a JSON object all land
/// here, and none of them is ever reported as "not found".
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error(transparent)]
    Common(#[from] CommonError),
}

/// Crypto result type
pub type CryptoResult<T> = Result<T, CryptoError>;

impl CryptoError {
    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a decryption error
    pub fn decryption(message: impl Into<String>) -> Self {
        Self::Decryption(message.into())
    }

    /// True when the error means "wrong key or corrupted ciphertext"
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }
}

impl ErrorClassification for CryptoError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidInput(_) => ErrorSeverity::Error,
            Self::Decryption(_) => ErrorSeverity::Critical,
            Self::Encryption(_) => ErrorSeverity::Error,
            Self::Common(err) => err.severity(),
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Decryption(_)) || matches!(self, Self::Common(err) if err.is_critical())
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Convert CryptoError to CommonError for integration
impl From<CryptoError> for CommonError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Common(common_err) => common_err,
            CryptoError::InvalidInput(message) => CommonError::validation("crypto", message),
            other => CommonError::internal_with_context(other.to_string(), "crypto"),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for crypto::error.
    use super::*;

    #[test]
    fn decryption_is_critical_and_not_retryable() {
        let err = CryptoError::decryption("wrong passphrase or corrupted data");
        assert!(err.is_decryption());
        assert!(err.is_critical());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Decryption failed: wrong passphrase or corrupted data");
    }

    #[test]
    fn invalid_input_maps_to_validation() {
        let common: CommonError = CryptoError::invalid_input("salt is required").into();
        assert!(matches!(common, CommonError::Validation { .. }));
    }
}
