//! # Cipherlog Domain
//!
//! Domain types and models for the encrypted event log.
//!
//! This crate contains:
//! - Record and parameter types (`CryptoParams`, `LogRecord`, payloads)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and timestamp helpers
//!
//! ## Architecture
//! - Depends only on the crypto error tier of `cipherlog-common`
//! - No I/O
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::timestamp::{format_timestamp, now_timestamp, parse_timestamp, TIMESTAMP_FORMAT};
