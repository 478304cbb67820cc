//! Per-operation connection management for Cipherlog database files.

use std::path::Path;

use cipherlog_common::{SqliteConfig, SqliteConnection};
use cipherlog_domain::{DatabaseConfig, Result};
use tracing::{debug, info};

use crate::errors::{map_sql_error, map_storage_error, InfraError};

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Opens connections to database files on demand
///
/// Holds connection settings only. Every call opens a fresh connection that
/// the caller drops when its operation is done.
#[derive(Debug, Clone, Default)]
pub struct DbManager {
    config: SqliteConfig,
}

impl DbManager {
    /// Create a manager with explicit connection settings
    pub fn new(config: SqliteConfig) -> Self {
        Self { config }
    }

    /// Create a manager from the database section of the app configuration
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(SqliteConfig::new(
            config.busy_timeout_ms,
            config.enable_wal,
            config.synchronous_full,
        ))
    }

    /// Connection settings in use
    pub fn sqlite_config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Open a database for writing, creating the file, any missing parent
    /// directories, and the schema as needed
    pub fn open(&self, db: &Path) -> Result<SqliteConnection> {
        if let Some(parent) = db.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(InfraError::from)?;
                info!(dir = %parent.display(), "created database directory");
            }
        }

        let conn = SqliteConnection::open(db, &self.config).map_err(map_storage_error)?;
        ensure_schema(&conn)?;
        Ok(conn)
    }

    /// Open a database for reading without creating anything
    ///
    /// `Ok(None)` when the file does not exist.
    pub fn open_existing(&self, db: &Path) -> Result<Option<SqliteConnection>> {
        SqliteConnection::open_existing(db, &self.config).map_err(map_storage_error)
    }

    /// Verify the database answers a trivial query
    pub fn health_check(&self, db: &Path) -> Result<()> {
        let conn = self.open(db)?;
        conn.query_row("SELECT 1", &[], |row| row.get::<_, i32>(0)).map_err(map_storage_error)?;
        Ok(())
    }
}

/// Create the schema if absent
pub fn ensure_schema(conn: &SqliteConnection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
    debug!("schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn table_names(conn: &SqliteConnection) -> Vec<String> {
        conn.query_map(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'index') AND name NOT LIKE 'sqlite_%' ORDER BY name",
            &[],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn open_creates_schema() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("test.db");

        let conn = DbManager::default().open(&db_path).expect("open");

        assert_eq!(table_names(&conn), vec!["idx_logs_ts", "logs", "meta"]);
    }

    /// Schema creation is idempotent and keeps existing rows.
    #[test]
    fn ensure_schema_is_non_destructive() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::default();

        {
            let conn = manager.open(&db_path).expect("open");
            conn.execute(
                "INSERT INTO logs (ts, event_type, keysym, keycode, ciphertext) VALUES (?1, 'key', 'a', 97, x'00')",
                &[&"2024-01-01T00:00:00Z"],
            )
            .expect("insert");
        }

        let conn = manager.open(&db_path).expect("reopen");
        ensure_schema(&conn).expect("ensure again");
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM logs", &[], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("nested").join("deeper").join("keystrokes.db");

        DbManager::default().open(&db_path).expect("open");

        assert!(db_path.is_file());
    }

    #[test]
    fn open_existing_does_not_create() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("missing").join("keystrokes.db");

        assert!(DbManager::default().open_existing(&db_path).expect("lookup").is_none());
        assert!(!db_path.parent().unwrap().exists());
    }

    #[test]
    fn health_check_succeeds_for_valid_database() {
        let temp_dir = TempDir::new().expect("temp dir created");
        DbManager::default().health_check(&temp_dir.path().join("test.db")).expect("healthy");
    }

    #[test]
    fn from_config_maps_fields() {
        let config = DatabaseConfig { busy_timeout_ms: 750, enable_wal: true, ..DatabaseConfig::default() };
        let manager = DbManager::from_config(&config);

        assert_eq!(manager.sqlite_config(), &SqliteConfig::new(750, true, true));
    }
}
