//! Per-operation SQLite connection wrapper

use std::ops::{Deref, DerefMut};
use std::path::Path;

use rusqlite::{Connection as RusqliteConnection, OpenFlags, Row, ToSql};
use tracing::{debug, instrument};

use super::config::SqliteConfig;
use super::pragmas::{apply_connection_pragmas, apply_read_pragmas};
use crate::storage::error::{StorageError, StorageResult};

/// SQLite connection wrapper
///
/// Owns one rusqlite connection with pragmas applied. The handle is closed
/// when the wrapper is dropped, including on error paths.
pub struct SqliteConnection {
    inner: RusqliteConnection,
}

impl SqliteConnection {
    /// Open (creating if absent) a database file read-write
    #[instrument(skip(config), fields(path = %path.display()))]
    pub fn open(path: &Path, config: &SqliteConfig) -> StorageResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI;
        let inner = RusqliteConnection::open_with_flags(path, flags)?;
        apply_connection_pragmas(&inner, config)?;
        Ok(Self { inner })
    }

    /// Open an existing database file without ever creating it
    ///
    /// Returns `Ok(None)` when the file does not exist. Only the busy timeout
    /// is applied; the file's journal mode is left as it is.
    #[instrument(skip(config), fields(path = %path.display()))]
    pub fn open_existing(path: &Path, config: &SqliteConfig) -> StorageResult<Option<Self>> {
        if !path.is_file() {
            debug!("database file absent");
            return Ok(None);
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI;
        match Self::open_for_read(path, flags, config) {
            Ok(conn) => Ok(Some(conn)),
            Err(StorageError::Rusqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == rusqlite::ErrorCode::CannotOpen =>
            {
                debug!("database file vanished before open");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn open_for_read(path: &Path, flags: OpenFlags, config: &SqliteConfig) -> StorageResult<Self> {
        let inner = RusqliteConnection::open_with_flags(path, flags)?;
        apply_read_pragmas(&inner, config)?;
        Ok(Self { inner })
    }

    /// Get a reference to the inner connection
    pub fn inner(&self) -> &RusqliteConnection {
        &self.inner
    }

    /// True when a table with this name exists
    pub fn table_exists(&self, table: &str) -> StorageResult<bool> {
        let count: i64 = self.inner.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Execute a SQL query that returns a single row
    #[instrument(skip(self, params, f), fields(sql = %sql))]
    pub fn query_row<T, F>(&self, sql: &str, params: &[&dyn ToSql], f: F) -> StorageResult<T>
    where
        F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        self.inner.query_row(sql, params, f).map_err(StorageError::from)
    }

    /// Prepare a statement and collect every mapped row
    #[instrument(skip(self, params, f), fields(sql = %sql))]
    pub fn query_map<T, F>(&self, sql: &str, params: &[&dyn ToSql], f: F) -> StorageResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        let mut stmt = self.inner.prepare(sql)?;
        let rows = stmt.query_map(params, f)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StorageError::from)
    }

    /// Execute a statement and return the number of changed rows
    #[instrument(skip(self, params), fields(sql = %sql))]
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> StorageResult<usize> {
        self.inner.execute(sql, params).map_err(StorageError::from)
    }
}

impl Deref for SqliteConnection {
    type Target = RusqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SqliteConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
