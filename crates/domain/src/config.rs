//! Configuration structures
//!
//! Every field has a serde default so partial files (or none at all) still
//! yield a usable configuration. Call [`Config::validate`] after loading.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DB_FILENAME, DEFAULT_KDF_ITERATIONS, DEFAULT_SALT_LEN,
    MAX_SALT_LEN, MIN_KDF_ITERATIONS,
};
use crate::errors::{CipherlogError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub crypto: CryptoConfig,
}

/// Database file and connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// WAL journaling adds sidecar files next to the database
    #[serde(default)]
    pub enable_wal: bool,
    #[serde(default = "default_true")]
    pub synchronous_full: bool,
}

/// Parameters used when a database's crypto params are first created
///
/// Existing databases keep the values stored in their `meta` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoConfig {
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
    #[serde(default = "default_salt_len")]
    pub salt_len: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            enable_wal: false,
            synchronous_full: true,
        }
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self { kdf_iterations: default_kdf_iterations(), salt_len: default_salt_len() }
    }
}

impl Config {
    /// Check value ranges
    ///
    /// # Errors
    /// Returns `CipherlogError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(CipherlogError::Config("database.path must not be empty".into()));
        }
        if self.crypto.kdf_iterations < MIN_KDF_ITERATIONS {
            return Err(CipherlogError::Config(format!(
                "crypto.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                self.crypto.kdf_iterations
            )));
        }
        if !(DEFAULT_SALT_LEN..=MAX_SALT_LEN).contains(&self.crypto.salt_len) {
            return Err(CipherlogError::Config(format!(
                "crypto.salt_len must be between {DEFAULT_SALT_LEN} and {MAX_SALT_LEN}, got {}",
                self.crypto.salt_len
            )));
        }
        Ok(())
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_FILENAME)
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}

fn default_salt_len() -> usize {
    DEFAULT_SALT_LEN
}

fn default_true() -> bool {
    true
}
