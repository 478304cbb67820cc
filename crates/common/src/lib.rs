//! Modular common utilities shared across Cipherlog crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error types and classification
//! - `runtime`: cryptographic primitives (key derivation, record cipher)
//! - `platform`: embedded SQLite storage primitives
//! - `observability`: tracing instrumentation

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod crypto;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod storage;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use crypto::{CryptoError, CryptoResult, DerivedKey, RecordCipher};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "platform")]
pub use storage::{SqliteConfig, SqliteConnection, StorageError, StorageResult};
