//! # Cipherlog Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for parameter and record storage (traits)
//! - The event log service and its key-caching sessions
//!
//! ## Architecture Principles
//! - Depends on `cipherlog-common` (crypto) and `cipherlog-domain`
//! - No database or platform code
//! - All storage via traits, implemented in `cipherlog-infra`

pub mod event_log;

pub use event_log::ports::{CryptoParamsStore, EventLogStore};
pub use event_log::service::{EventLogService, LogSession};
