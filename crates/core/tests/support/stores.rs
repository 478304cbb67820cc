//! In-memory store implementations for testing
//!
//! Keyed by database path so tests can exercise several "files" at once
//! without touching disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use cipherlog_common::crypto::generate_salt;
use cipherlog_core::{CryptoParamsStore, EventLogStore};
use cipherlog_domain::constants::{DEFAULT_SALT_LEN, MIN_KDF_ITERATIONS};
use cipherlog_domain::{now_timestamp, CryptoParams, IndexFields, LogRecord, Result};

/// In-memory `CryptoParamsStore` that counts calls
#[derive(Default)]
pub struct MemoryParamsStore {
    params: Mutex<HashMap<PathBuf, CryptoParams>>,
    pub creates: AtomicUsize,
    pub lookups: AtomicUsize,
}

impl MemoryParamsStore {
    pub fn contains(&self, db: &Path) -> bool {
        self.params.lock().unwrap().contains_key(db)
    }
}

impl CryptoParamsStore for MemoryParamsStore {
    fn get_or_create(&self, db: &Path) -> Result<CryptoParams> {
        let mut params = self.params.lock().unwrap();
        let entry = params.entry(db.to_path_buf()).or_insert_with(|| {
            self.creates.fetch_add(1, Ordering::SeqCst);
            CryptoParams {
                salt: generate_salt(DEFAULT_SALT_LEN),
                kdf_iterations: MIN_KDF_ITERATIONS,
                created_at: now_timestamp(),
            }
        });
        Ok(entry.clone())
    }

    fn get_existing(&self, db: &Path) -> Result<Option<CryptoParams>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.params.lock().unwrap().get(db).cloned())
    }
}

/// In-memory append-only `EventLogStore`
#[derive(Default)]
pub struct MemoryLogStore {
    records: Mutex<HashMap<PathBuf, Vec<LogRecord>>>,
}

impl MemoryLogStore {
    /// Overwrite a stored ciphertext to simulate on-disk corruption
    pub fn corrupt(&self, db: &Path, id: i64) {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(db)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
            .expect("record to corrupt");
        let last = record.ciphertext.len() - 1;
        record.ciphertext[last] ^= 0xff;
    }

    fn newest_first(rows: impl Iterator<Item = LogRecord>, limit: Option<usize>) -> Vec<LogRecord> {
        let mut rows: Vec<LogRecord> = rows.collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        rows
    }
}

impl EventLogStore for MemoryLogStore {
    fn append(
        &self,
        db: &Path,
        timestamp: &str,
        event_type: &str,
        index_fields: &IndexFields,
        ciphertext: &[u8],
    ) -> Result<i64> {
        let mut records = self.records.lock().unwrap();
        let rows = records.entry(db.to_path_buf()).or_default();
        let id = rows.len() as i64 + 1;
        rows.push(LogRecord {
            id,
            timestamp: timestamp.to_owned(),
            event_type: event_type.to_owned(),
            index_fields: index_fields.clone(),
            ciphertext: ciphertext.to_vec(),
        });
        Ok(id)
    }

    fn fetch(&self, db: &Path, limit: Option<usize>) -> Result<Vec<LogRecord>> {
        let records = self.records.lock().unwrap();
        let rows = records.get(db).cloned().unwrap_or_default();
        Ok(Self::newest_first(rows.into_iter(), limit))
    }

    fn fetch_between(
        &self,
        db: &Path,
        start: &str,
        end: &str,
        limit: Option<usize>,
    ) -> Result<Vec<LogRecord>> {
        let records = self.records.lock().unwrap();
        let rows = records.get(db).cloned().unwrap_or_default();
        let in_range = rows
            .into_iter()
            .filter(|r| r.timestamp.as_str() >= start && r.timestamp.as_str() <= end);
        Ok(Self::newest_first(in_range, limit))
    }

    fn count(&self, db: &Path) -> Result<u64> {
        Ok(self.records.lock().unwrap().get(db).map_or(0, |rows| rows.len() as u64))
    }
}
