//! Application context - dependency injection container

use std::path::Path;
use std::sync::Arc;

use cipherlog_core::{CryptoParamsStore, EventLogService, EventLogStore};
use cipherlog_domain::{Config, Result};
use cipherlog_infra::{config, DbManager, SqliteCryptoParamsStore, SqliteEventLogStore};
use tracing::info;

/// Type alias for crypto params port trait object
type DynCryptoParamsStore = dyn CryptoParamsStore + 'static;

/// Type alias for event log port trait object
type DynEventLogStore = dyn EventLogStore + 'static;

/// Application context - holds all services and dependencies
///
/// The context owns no open connection and no key; it only knows how to
/// reach a database file once a command names one.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub crypto_params: Arc<DynCryptoParamsStore>,
    pub event_log: Arc<DynEventLogStore>,
    pub service: EventLogService,
}

impl AppContext {
    /// Build a context from the loaded configuration
    ///
    /// See [`cipherlog_infra::config::load`] for the source order.
    pub fn new() -> Result<Self> {
        let config = config::load()?;
        Self::with_config(config)
    }

    /// Build a context from an explicit configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let db = Arc::new(DbManager::from_config(&config.database));
        let crypto_params: Arc<DynCryptoParamsStore> = Arc::new(
            SqliteCryptoParamsStore::new(Arc::clone(&db)).with_crypto_config(&config.crypto),
        );
        let event_log: Arc<DynEventLogStore> = Arc::new(
            SqliteEventLogStore::new(Arc::clone(&db)).with_crypto_config(&config.crypto),
        );
        let service = EventLogService::new(Arc::clone(&crypto_params), Arc::clone(&event_log));

        info!(
            default_db = %config.database.path.display(),
            kdf_iterations = config.crypto.kdf_iterations,
            "application context initialised"
        );

        Ok(Self { config, db, crypto_params, event_log, service })
    }

    /// Database path front-ends should offer when the user has not picked one
    pub fn default_db_path(&self) -> &Path {
        &self.config.database.path
    }

    /// Open (creating if needed) the database and run a trivial query
    pub fn health_check(&self, db: &Path) -> Result<()> {
        self.db.health_check(db)
    }
}
