//! # Cipherlog API
//!
//! Command layer for front-ends (keystroke capture window, log viewer).
//!
//! This crate contains:
//! - Commands for params, records, and record crypto
//! - Session commands that derive the key once and reuse it
//! - Application context (dependency injection)
//! - Tracing setup and per-command logging
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the SQLite stores into the core service
//! - Every command takes the database path (and passphrase or key) explicitly;
//!   nothing here keeps a process-wide session

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
pub use utils::logging::init_tracing;
