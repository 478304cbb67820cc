//! Embedded SQLite storage primitives
//!
//! Thin wrappers over rusqlite that every repository in the workspace builds
//! on: per-operation connections with consistent pragmas, and a storage error
//! type that integrates with [`crate::error`].
//!
//! Connections are opened for one logical operation and closed on drop.
//! Nothing here caches a handle across calls.

pub mod config;
pub mod connection;
pub mod error;
pub mod pragmas;

pub use config::SqliteConfig;
pub use connection::SqliteConnection;
pub use error::{StorageError, StorageResult};
pub use pragmas::{apply_connection_pragmas, apply_read_pragmas};
