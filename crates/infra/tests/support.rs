//! Shared harness for infra integration tests

use std::path::PathBuf;
use std::sync::Arc;

use cipherlog_domain::CryptoConfig;
use cipherlog_domain::constants::MIN_KDF_ITERATIONS;
use cipherlog_infra::database::{DbManager, SqliteCryptoParamsStore, SqliteEventLogStore};
use tempfile::TempDir;

/// Temporary directory holding a database path that does not exist yet.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let path = temp_dir.path().join("keystrokes.db");

        Self { manager: Arc::new(DbManager::default()), path, _temp_dir: temp_dir }
    }

    /// Params store writing the fast test work factor for new databases.
    pub fn params_store(&self) -> SqliteCryptoParamsStore {
        SqliteCryptoParamsStore::new(Arc::clone(&self.manager))
            .with_crypto_config(&test_crypto_config())
    }

    pub fn log_store(&self) -> SqliteEventLogStore {
        SqliteEventLogStore::new(Arc::clone(&self.manager)).with_crypto_config(&test_crypto_config())
    }
}

/// Fast work factor for databases created by tests.
fn test_crypto_config() -> CryptoConfig {
    CryptoConfig { kdf_iterations: MIN_KDF_ITERATIONS, ..CryptoConfig::default() }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}
