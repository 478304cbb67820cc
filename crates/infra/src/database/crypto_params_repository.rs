//! Crypto params repository implementation using SQLite
//!
//! The `meta` table holds exactly one row (`id = 1`). Creation happens in an
//! IMMEDIATE transaction with an insert that yields on conflict, so any
//! number of processes racing on a fresh file end up reading the same row.

use std::path::Path;
use std::sync::Arc;

use cipherlog_common::crypto::generate_salt;
use cipherlog_common::{SqliteConnection, StorageError, StorageResult};
use cipherlog_core::CryptoParamsStore;
use cipherlog_domain::constants::MIN_KDF_ITERATIONS;
use cipherlog_domain::{now_timestamp, CryptoConfig, CryptoParams, Result as DomainResult};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use tracing::{debug, info, instrument};

use super::manager::DbManager;
use crate::errors::map_storage_error;

/// SQLite-backed implementation of `CryptoParamsStore`
pub struct SqliteCryptoParamsStore {
    db: Arc<DbManager>,
    crypto: CryptoConfig,
}

impl SqliteCryptoParamsStore {
    /// Create a store that writes default parameters for new databases
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db, crypto: CryptoConfig::default() }
    }

    /// Override the parameters written for new databases
    ///
    /// Existing databases always keep their stored values.
    pub fn with_crypto_config(mut self, config: &CryptoConfig) -> Self {
        self.crypto = config.clone();
        self
    }
}

impl CryptoParamsStore for SqliteCryptoParamsStore {
    #[instrument(skip(self), fields(db = %db.display()))]
    fn get_or_create(&self, db: &Path) -> DomainResult<CryptoParams> {
        let mut conn = self.db.open(db)?;
        let candidate = fresh_params(&self.crypto);

        let (params, created) = insert_or_read(&mut conn, &candidate).map_err(map_storage_error)?;
        if created {
            info!(kdf_iterations = params.kdf_iterations, "crypto params created");
        } else {
            debug!("crypto params already present");
        }
        Ok(params)
    }

    #[instrument(skip(self), fields(db = %db.display()))]
    fn get_existing(&self, db: &Path) -> DomainResult<Option<CryptoParams>> {
        let Some(conn) = self.db.open_existing(db)? else {
            return Ok(None);
        };
        query_params(&conn).map_err(map_storage_error)
    }
}

fn insert_or_read(
    conn: &mut SqliteConnection,
    candidate: &CryptoParams,
) -> StorageResult<(CryptoParams, bool)> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let inserted = insert_meta_if_absent(&tx, candidate)?;

    let stored = tx.query_row(
        "SELECT salt, kdf_iters, created_at FROM meta WHERE id = 1",
        [],
        map_meta_row,
    )?;
    tx.commit()?;

    Ok((into_params(stored)?, inserted))
}

/// Params to store if the database has none yet
pub(crate) fn fresh_params(config: &CryptoConfig) -> CryptoParams {
    CryptoParams {
        salt: generate_salt(config.salt_len),
        kdf_iterations: config.kdf_iterations,
        created_at: now_timestamp(),
    }
}

/// Write the singleton `meta` row unless one exists; `true` if this call wrote it
///
/// Run inside an IMMEDIATE transaction so the check and the write are atomic.
pub(crate) fn insert_meta_if_absent(
    conn: &Connection,
    candidate: &CryptoParams,
) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO meta (id, salt, kdf_iters, created_at) VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO NOTHING",
        params![candidate.salt, i64::from(candidate.kdf_iterations), candidate.created_at],
    )?;
    Ok(inserted == 1)
}

fn query_params(conn: &SqliteConnection) -> StorageResult<Option<CryptoParams>> {
    if !conn.table_exists("meta")? {
        return Ok(None);
    }

    let result =
        conn.query_row("SELECT salt, kdf_iters, created_at FROM meta WHERE id = 1", &[], map_meta_row);

    match result {
        Ok(row) => into_params(row).map(Some),
        Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
        Err(err) => Err(err),
    }
}

type MetaRow = (Vec<u8>, i64, String);

fn map_meta_row(row: &Row<'_>) -> rusqlite::Result<MetaRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_params((salt, kdf_iters, created_at): MetaRow) -> StorageResult<CryptoParams> {
    if salt.is_empty() {
        return Err(StorageError::Schema("meta.salt is empty".into()));
    }
    let kdf_iterations = u32::try_from(kdf_iters)
        .map_err(|_| StorageError::Schema(format!("meta.kdf_iters out of range: {kdf_iters}")))?;
    if kdf_iterations < MIN_KDF_ITERATIONS {
        return Err(StorageError::Schema(format!(
            "meta.kdf_iters {kdf_iterations} below minimum {MIN_KDF_ITERATIONS}"
        )));
    }

    Ok(CryptoParams { salt, kdf_iterations, created_at })
}

#[cfg(test)]
mod tests {
    use cipherlog_domain::constants::{DEFAULT_KDF_ITERATIONS, DEFAULT_SALT_LEN};
    use tempfile::TempDir;

    use super::*;

    fn store() -> SqliteCryptoParamsStore {
        SqliteCryptoParamsStore::new(Arc::new(DbManager::default()))
    }

    #[test]
    fn get_or_create_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let params = store().get_or_create(&temp_dir.path().join("p.db")).unwrap();

        assert_eq!(params.salt.len(), DEFAULT_SALT_LEN);
        assert_eq!(params.kdf_iterations, DEFAULT_KDF_ITERATIONS);
        assert_eq!(params.created_at.len(), 20);
    }

    #[test]
    fn crypto_config_applies_only_to_new_databases() {
        let temp_dir = TempDir::new().unwrap();
        let db = temp_dir.path().join("p.db");
        let first = store().get_or_create(&db).unwrap();

        let custom = store().with_crypto_config(&CryptoConfig { kdf_iterations: 75_000, salt_len: 32 });
        assert_eq!(custom.get_or_create(&db).unwrap(), first);

        let fresh = custom.get_or_create(&temp_dir.path().join("q.db")).unwrap();
        assert_eq!(fresh.kdf_iterations, 75_000);
        assert_eq!(fresh.salt.len(), 32);
    }

    /// Validates the singleton constraint at the schema level.
    ///
    /// Assertions:
    /// - A second row with any id other than 1 is rejected by the CHECK.
    /// - A second row with id 1 is rejected by the primary key.
    #[test]
    fn meta_table_rejects_second_row() {
        let temp_dir = TempDir::new().unwrap();
        let db = temp_dir.path().join("p.db");
        store().get_or_create(&db).unwrap();

        let conn = DbManager::default().open(&db).unwrap();
        let other_id = conn.execute(
            "INSERT INTO meta (id, salt, kdf_iters, created_at) VALUES (2, x'00', 50000, 'x')",
            &[],
        );
        let same_id = conn.execute(
            "INSERT INTO meta (id, salt, kdf_iters, created_at) VALUES (1, x'00', 50000, 'x')",
            &[],
        );

        assert!(other_id.is_err());
        assert!(same_id.is_err());
    }

    #[test]
    fn get_existing_on_schema_without_row_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let db = temp_dir.path().join("p.db");
        DbManager::default().open(&db).unwrap();

        assert_eq!(store().get_existing(&db).unwrap(), None);
    }

    #[test]
    fn corrupt_iterations_are_a_schema_error() {
        let temp_dir = TempDir::new().unwrap();
        let db = temp_dir.path().join("p.db");
        let conn = DbManager::default().open(&db).unwrap();
        conn.execute(
            "INSERT INTO meta (id, salt, kdf_iters, created_at) VALUES (1, x'0102', -5, 'x')",
            &[],
        )
        .unwrap();
        drop(conn);

        let err = store().get_existing(&db).unwrap_err();
        assert!(matches!(err, cipherlog_domain::CipherlogError::Storage(ref m) if m.contains("kdf_iters")));
    }
}
