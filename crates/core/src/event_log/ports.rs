//! Port interfaces for the encrypted event log
//!
//! These traits define the boundaries between core business logic
//! and storage implementations. Every method takes the database path
//! explicitly; implementations hold no per-database state between calls.

use std::path::Path;

use cipherlog_domain::{CryptoParams, IndexFields, LogRecord, Result};

/// Per-database key derivation parameters
pub trait CryptoParamsStore: Send + Sync {
    /// Return the stored params, creating them first if the database has none
    ///
    /// Concurrent callers on a fresh database must all observe the same row.
    fn get_or_create(&self, db: &Path) -> Result<CryptoParams>;

    /// Return the stored params without creating anything
    ///
    /// `Ok(None)` when the file, the table or the row is missing.
    fn get_existing(&self, db: &Path) -> Result<Option<CryptoParams>>;
}

/// Append-only storage of encrypted records
pub trait EventLogStore: Send + Sync {
    /// Append one record atomically and return its id
    ///
    /// On a database without params, the params are created in the same
    /// atomic step, so records never exist without them.
    fn append(
        &self,
        db: &Path,
        timestamp: &str,
        event_type: &str,
        index_fields: &IndexFields,
        ciphertext: &[u8],
    ) -> Result<i64>;

    /// Newest records first (timestamp, then id, descending)
    ///
    /// `None` returns every record. A missing file or table yields an empty
    /// list.
    fn fetch(&self, db: &Path, limit: Option<usize>) -> Result<Vec<LogRecord>>;

    /// Like [`EventLogStore::fetch`], restricted to `start <= timestamp <= end`
    fn fetch_between(
        &self,
        db: &Path,
        start: &str,
        end: &str,
        limit: Option<usize>,
    ) -> Result<Vec<LogRecord>>;

    /// Number of stored records (0 when the file or table is missing)
    fn count(&self, db: &Path) -> Result<u64>;
}
