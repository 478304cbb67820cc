//! Stored record and parameter types

use std::fmt;

use serde::{Deserialize, Serialize};

use super::payload::EventPayload;

/// Per-database key derivation parameters
///
/// Exactly one per database file. Created on first write and never changed
/// afterwards, so every record in a file is sealed under a key derived from
/// the same salt and work factor.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoParams {
    pub salt: Vec<u8>,
    pub kdf_iterations: u32,
    /// ISO-8601 UTC, second precision; informational only
    pub created_at: String,
}

impl fmt::Debug for CryptoParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoParams")
            .field("salt", &format_args!("[{} bytes]", self.salt.len()))
            .field("kdf_iterations", &self.kdf_iterations)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Plaintext listing metadata stored next to each ciphertext
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFields {
    pub keysym: String,
    pub keycode: i64,
}

impl IndexFields {
    pub fn new(keysym: impl Into<String>, keycode: i64) -> Self {
        Self { keysym: keysym.into(), keycode }
    }
}

/// One appended event
///
/// Immutable once written. `id` is assigned by the store and increases with
/// every append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: i64,
    pub timestamp: String,
    pub event_type: String,
    pub index_fields: IndexFields,
    pub ciphertext: Vec<u8>,
}

/// A record together with its decrypted payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecryptedRecord {
    pub record: LogRecord,
    pub payload: EventPayload,
}

impl DecryptedRecord {
    /// Listing preview of the payload
    pub fn preview(&self) -> String {
        self.payload.preview()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_debug_hides_salt_bytes() {
        let params = CryptoParams {
            salt: vec![0xde; 16],
            kdf_iterations: 200_000,
            created_at: "2024-01-01T00:00:00Z".into(),
        };

        let debug = format!("{params:?}");
        assert!(debug.contains("[16 bytes]"));
        assert!(!debug.contains("222"));
    }
}
