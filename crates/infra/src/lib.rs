//! # Cipherlog Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite implementations of the parameter and record stores
//! - Schema management
//! - Configuration loading
//! - Conversions from storage errors into domain errors
//!
//! ## Architecture
//! - Implements traits defined in `cipherlog-core`
//! - Contains all "impure" code (file system, SQLite)

pub mod config;
pub mod database;
pub mod errors;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
