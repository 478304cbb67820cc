//! Event log repository implementation using SQLite
//!
//! The first append to a fresh file also writes the `meta` row, in the same
//! transaction, so a database never holds records without crypto params.

use std::path::Path;
use std::sync::Arc;

use cipherlog_common::{SqliteConnection, StorageResult};
use cipherlog_core::EventLogStore;
use cipherlog_domain::{CryptoConfig, CryptoParams, IndexFields, LogRecord, Result as DomainResult};
use rusqlite::{params, Row, ToSql, TransactionBehavior};
use tracing::{debug, info, instrument};

use super::crypto_params_repository::{fresh_params, insert_meta_if_absent};
use super::manager::DbManager;
use crate::errors::map_storage_error;

const SELECT_COLUMNS: &str = "SELECT id, ts, event_type, keysym, keycode, ciphertext FROM logs";

/// SQLite-backed implementation of `EventLogStore`
pub struct SqliteEventLogStore {
    db: Arc<DbManager>,
    crypto: CryptoConfig,
}

impl SqliteEventLogStore {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db, crypto: CryptoConfig::default() }
    }

    /// Parameters written when an append finds no `meta` row
    pub fn with_crypto_config(mut self, config: &CryptoConfig) -> Self {
        self.crypto = config.clone();
        self
    }

    /// Open for a read, yielding `None` when there is nothing to read
    fn open_for_read(&self, db: &Path) -> DomainResult<Option<SqliteConnection>> {
        let Some(conn) = self.db.open_existing(db)? else {
            return Ok(None);
        };
        if !conn.table_exists("logs").map_err(map_storage_error)? {
            debug!("logs table absent");
            return Ok(None);
        }
        Ok(Some(conn))
    }
}

impl EventLogStore for SqliteEventLogStore {
    #[instrument(skip(self, index_fields, ciphertext), fields(db = %db.display(), len = ciphertext.len()))]
    fn append(
        &self,
        db: &Path,
        timestamp: &str,
        event_type: &str,
        index_fields: &IndexFields,
        ciphertext: &[u8],
    ) -> DomainResult<i64> {
        let mut conn = self.db.open(db)?;
        let candidate = fresh_params(&self.crypto);

        let (id, params_created) =
            insert_log(&mut conn, &candidate, timestamp, event_type, index_fields, ciphertext)
                .map_err(map_storage_error)?;
        if params_created {
            info!(kdf_iterations = candidate.kdf_iterations, "crypto params created on first append");
        }
        Ok(id)
    }

    #[instrument(skip(self), fields(db = %db.display()))]
    fn fetch(&self, db: &Path, limit: Option<usize>) -> DomainResult<Vec<LogRecord>> {
        let Some(conn) = self.open_for_read(db)? else {
            return Ok(Vec::new());
        };
        query_logs(&conn, None, limit).map_err(map_storage_error)
    }

    #[instrument(skip(self), fields(db = %db.display()))]
    fn fetch_between(
        &self,
        db: &Path,
        start: &str,
        end: &str,
        limit: Option<usize>,
    ) -> DomainResult<Vec<LogRecord>> {
        let Some(conn) = self.open_for_read(db)? else {
            return Ok(Vec::new());
        };
        query_logs(&conn, Some((start, end)), limit).map_err(map_storage_error)
    }

    #[instrument(skip(self), fields(db = %db.display()))]
    fn count(&self, db: &Path) -> DomainResult<u64> {
        let Some(conn) = self.open_for_read(db)? else {
            return Ok(0);
        };
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM logs", &[], |row| row.get(0))
            .map_err(map_storage_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

fn insert_log(
    conn: &mut SqliteConnection,
    candidate: &CryptoParams,
    timestamp: &str,
    event_type: &str,
    index_fields: &IndexFields,
    ciphertext: &[u8],
) -> StorageResult<(i64, bool)> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let params_created = insert_meta_if_absent(&tx, candidate)?;
    tx.execute(
        "INSERT INTO logs (ts, event_type, keysym, keycode, ciphertext) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![timestamp, event_type, index_fields.keysym, index_fields.keycode, ciphertext],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok((id, params_created))
}

fn query_logs(
    conn: &SqliteConnection,
    range: Option<(&str, &str)>,
    limit: Option<usize>,
) -> StorageResult<Vec<LogRecord>> {
    // SQLite treats a negative LIMIT as "no limit".
    let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));

    let mut sql = String::from(SELECT_COLUMNS);
    let mut params: Vec<&dyn ToSql> = Vec::new();

    if let Some((start, end)) = range.as_ref() {
        sql.push_str(" WHERE ts >= ? AND ts <= ?");
        params.push(start);
        params.push(end);
    }

    sql.push_str(" ORDER BY ts DESC, id DESC LIMIT ?");
    params.push(&limit);

    conn.query_map(&sql, params.as_slice(), map_log_row)
}

fn map_log_row(row: &Row<'_>) -> rusqlite::Result<LogRecord> {
    Ok(LogRecord {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        event_type: row.get(2)?,
        index_fields: IndexFields { keysym: row.get(3)?, keycode: row.get(4)? },
        ciphertext: row.get(5)?,
    })
}
