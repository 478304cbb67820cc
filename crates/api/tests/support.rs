//! Shared harness for command tests

use std::path::PathBuf;

use cipherlog_api::AppContext;
use cipherlog_domain::constants::MIN_KDF_ITERATIONS;
use cipherlog_domain::Config;
use tempfile::TempDir;

/// Context wired to a temporary directory whose database does not exist yet.
pub struct TestApp {
    pub ctx: AppContext,
    pub db: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db = temp_dir.path().join("keystrokes.db");

        let mut config = Config::default();
        config.database.path = db.clone();
        config.crypto.kdf_iterations = MIN_KDF_ITERATIONS;

        let ctx = AppContext::with_config(config).expect("test config should be valid");
        Self { ctx, db, _temp_dir: temp_dir }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
