//! SQLite pragma management

use rusqlite::Connection;

use super::config::SqliteConfig;
use crate::storage::error::{StorageError, StorageResult};

/// Apply connection-level pragmas
///
/// The busy timeout is installed first: `journal_mode` changes take a lock,
/// and a second process opening the same file must wait rather than fail.
///
/// - busy timeout from `config`
/// - WAL journaling when enabled, otherwise the rollback journal
/// - `synchronous` FULL or NORMAL
pub fn apply_connection_pragmas(conn: &Connection, config: &SqliteConfig) -> StorageResult<()> {
    apply_read_pragmas(conn, config)?;

    let mut pragma_sql = String::new();

    if config.enable_wal {
        pragma_sql.push_str("PRAGMA journal_mode=WAL;\n");
        pragma_sql.push_str("PRAGMA wal_autocheckpoint=1000;\n");
    }

    if config.synchronous_full {
        pragma_sql.push_str("PRAGMA synchronous=FULL;\n");
    } else {
        pragma_sql.push_str("PRAGMA synchronous=NORMAL;\n");
    }

    conn.execute_batch(&pragma_sql)
        .map_err(|e| StorageError::Query(format!("Failed to apply pragmas: {e}")))?;

    Ok(())
}

/// Apply the pragmas a read needs: the busy timeout only
///
/// Reads leave `journal_mode` and `synchronous` as the file has them, so
/// opening a database to look at it never rewrites its header.
pub fn apply_read_pragmas(conn: &Connection, config: &SqliteConfig) -> StorageResult<()> {
    conn.busy_timeout(config.busy_timeout)
        .map_err(|e| StorageError::Connection(format!("Failed to set busy timeout: {e}")))
}
