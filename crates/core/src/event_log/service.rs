//! Event log service - write and read flows over the storage ports

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cipherlog_common::crypto::derive_key;
use cipherlog_common::{DerivedKey, RecordCipher};
use cipherlog_domain::constants::EVENT_TYPE_KEY;
use cipherlog_domain::{
    format_timestamp, parse_timestamp, CipherlogError, CryptoParams, DecryptedRecord,
    EventPayload, IndexFields, KeyEventPayload, LogRecord, Result,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::ports::{CryptoParamsStore, EventLogStore};

/// Entry point for opening sessions against a database file
#[derive(Clone)]
pub struct EventLogService {
    params: Arc<dyn CryptoParamsStore>,
    log: Arc<dyn EventLogStore>,
}

impl EventLogService {
    /// Create a new service over the given stores
    pub fn new(params: Arc<dyn CryptoParamsStore>, log: Arc<dyn EventLogStore>) -> Self {
        Self { params, log }
    }

    /// Start a session that may append records
    ///
    /// Creates the database's params on first use, then derives the key once.
    /// The passphrase is checked before anything touches the database.
    #[instrument(skip(self, passphrase), fields(db = %db.display()))]
    pub fn open_for_writing(&self, db: &Path, passphrase: &str) -> Result<LogSession> {
        ensure_passphrase(passphrase)?;

        let params = self.params.get_or_create(db)?;
        let session = LogSession::start(db, passphrase, params, Arc::clone(&self.log))?;

        info!(fingerprint = %session.key_fingerprint(), "write session opened");
        Ok(session)
    }

    /// Start a read-only session
    ///
    /// Returns `Ok(None)` when the database has no params yet, which means no
    /// record has ever been written to it. Nothing is created.
    #[instrument(skip(self, passphrase), fields(db = %db.display()))]
    pub fn open_for_reading(&self, db: &Path, passphrase: &str) -> Result<Option<LogSession>> {
        ensure_passphrase(passphrase)?;

        let Some(params) = self.params.get_existing(db)? else {
            debug!("no crypto params stored; nothing to read");
            return Ok(None);
        };

        let session = LogSession::start(db, passphrase, params, Arc::clone(&self.log))?;
        info!(fingerprint = %session.key_fingerprint(), "read session opened");
        Ok(Some(session))
    }

    /// Fetch raw records without decrypting them
    pub fn fetch_records(&self, db: &Path, limit: Option<usize>) -> Result<Vec<LogRecord>> {
        self.log.fetch(db, limit)
    }
}

/// A database path bound to a derived key
///
/// Key derivation is deliberately slow, so a session derives once and reuses
/// the key for every record. The key is zeroized when the session drops.
pub struct LogSession {
    db: PathBuf,
    params: CryptoParams,
    key: DerivedKey,
    cipher: RecordCipher,
    log: Arc<dyn EventLogStore>,
}

impl fmt::Debug for LogSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSession")
            .field("db", &self.db)
            .field("params", &self.params)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl LogSession {
    fn start(
        db: &Path,
        passphrase: &str,
        params: CryptoParams,
        log: Arc<dyn EventLogStore>,
    ) -> Result<Self> {
        let key = derive_key(passphrase, &params.salt, params.kdf_iterations)?;
        let cipher = RecordCipher::new(&key)?;

        Ok(Self { db: db.to_path_buf(), params, key, cipher, log })
    }

    /// Database this session writes to and reads from
    pub fn path(&self) -> &Path {
        &self.db
    }

    /// Params the key was derived from
    pub fn params(&self) -> &CryptoParams {
        &self.params
    }

    /// The session key
    pub fn key(&self) -> &DerivedKey {
        &self.key
    }

    /// Loggable key identifier
    pub fn key_fingerprint(&self) -> String {
        self.key.fingerprint()
    }

    /// Encrypt and append a key event stamped with `at`
    pub fn record_key_event(&self, event: &KeyEventPayload, at: DateTime<Utc>) -> Result<i64> {
        self.append_payload(&format_timestamp(at), EVENT_TYPE_KEY, &event.index_fields(), event)
    }

    /// Encrypt an arbitrary payload object and append it
    ///
    /// # Errors
    /// - `InvalidInput` for a malformed timestamp, an empty event type, or a
    ///   payload that is not a JSON object
    /// - `Storage` when the append fails; nothing is written in that case
    #[instrument(skip(self, index_fields, payload), fields(db = %self.db.display()))]
    pub fn append_payload<T: Serialize + ?Sized>(
        &self,
        timestamp: &str,
        event_type: &str,
        index_fields: &IndexFields,
        payload: &T,
    ) -> Result<i64> {
        parse_timestamp(timestamp)?;
        if event_type.trim().is_empty() {
            return Err(CipherlogError::InvalidInput("event_type must not be empty".into()));
        }

        let ciphertext = self.cipher.encrypt(payload)?;
        let id = self.log.append(&self.db, timestamp, event_type, index_fields, &ciphertext)?;

        debug!(id, "record appended");
        Ok(id)
    }

    /// Decrypt one record's payload
    pub fn decrypt_record(&self, record: &LogRecord) -> Result<EventPayload> {
        let fields = self.cipher.decrypt(&record.ciphertext)?;
        Ok(EventPayload::new(fields))
    }

    /// Newest records with their payloads
    ///
    /// Fails on the first record that does not decrypt; never returns a
    /// partial list.
    #[instrument(skip(self), fields(db = %self.db.display()))]
    pub fn load(&self, limit: Option<usize>) -> Result<Vec<DecryptedRecord>> {
        let records = self.log.fetch(&self.db, limit)?;
        self.decrypt_all(records)
    }

    /// Records with `start <= timestamp <= end`, newest first, decrypted
    #[instrument(skip(self), fields(db = %self.db.display()))]
    pub fn load_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<Vec<DecryptedRecord>> {
        if start > end {
            return Err(CipherlogError::InvalidInput(format!(
                "range start {} is after end {}",
                format_timestamp(start),
                format_timestamp(end)
            )));
        }

        let records = self.log.fetch_between(
            &self.db,
            &format_timestamp(start),
            &format_timestamp(end),
            limit,
        )?;
        self.decrypt_all(records)
    }

    /// Number of records in the database
    pub fn count(&self) -> Result<u64> {
        self.log.count(&self.db)
    }

    fn decrypt_all(&self, records: Vec<LogRecord>) -> Result<Vec<DecryptedRecord>> {
        let total = records.len();
        let decrypted = records
            .into_iter()
            .map(|record| {
                let payload = self.decrypt_record(&record)?;
                Ok(DecryptedRecord { record, payload })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(count = total, "records decrypted");
        Ok(decrypted)
    }
}

fn ensure_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.is_empty() {
        return Err(CipherlogError::InvalidInput("passphrase is required".into()));
    }
    Ok(())
}
