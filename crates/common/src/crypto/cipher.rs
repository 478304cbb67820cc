//! Authenticated encryption of structured record payloads.
//!
//! Payloads are serialized to canonical JSON (compact, object keys sorted at
//! every level) and sealed with AES-256-GCM under a fresh random 96-bit nonce.
//! The stored envelope is:
//!
//! ```text
//! +---------+-------------+------------------------------+
//! | version | nonce (12B) | ciphertext || GCM tag (16B)  |
//! +---------+-------------+------------------------------+
//! ```
//!
//! Identical payloads therefore never produce identical envelopes, and any
//! modification of any byte makes [`RecordCipher::decrypt`] fail with
//! [`CryptoError::Decryption`].

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use super::error::{CryptoError, CryptoResult};
use super::key::DerivedKey;

/// Envelope format version written by this module
pub const ENVELOPE_VERSION: u8 = 1;

/// AES-GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

const HEADER_LEN: usize = 1 + NONCE_LEN;

/// Decrypted payload: a JSON object with an open field set
pub type PayloadMap = Map<String, Value>;

/// AES-256-GCM cipher bound to one derived key
///
/// Construct once per session and reuse for every record.
pub struct RecordCipher {
    cipher: Aes256Gcm,
    fingerprint: String,
}

impl fmt::Debug for RecordCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordCipher")
            .field("key", &"[REDACTED]")
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

impl RecordCipher {
    /// Create a cipher for the given key
    pub fn new(key: &DerivedKey) -> CryptoResult<Self> {
        let cipher = Aes256Gcm::new_from_slice(key.expose()).map_err(|e| {
            CryptoError::Encryption(format!("Failed to create record cipher: {e}"))
        })?;

        Ok(Self { cipher, fingerprint: key.fingerprint() })
    }

    /// Fingerprint of the key this cipher was built from
    pub fn key_fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Serialize `payload` canonically and seal it
    ///
    /// # Errors
    /// [`CryptoError::InvalidInput`] if the payload does not serialize to a
    /// JSON object.
    pub fn encrypt<T: Serialize + ?Sized>(&self, payload: &T) -> CryptoResult<Vec<u8>> {
        let plaintext = Zeroizing::new(canonical_json(payload)?);
        self.seal(&plaintext)
    }

    /// Seal raw bytes into a versioned envelope
    pub fn seal(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CryptoError::Encryption(format!("AES-GCM seal failed: {e}")))?;

        let mut envelope = Vec::with_capacity(HEADER_LEN + sealed.len());
        envelope.push(ENVELOPE_VERSION);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&sealed);
        Ok(envelope)
    }

    /// Authenticate and open an envelope, returning the raw plaintext
    pub fn open(&self, envelope: &[u8]) -> CryptoResult<Vec<u8>> {
        if envelope.len() < HEADER_LEN + TAG_LEN {
            return Err(CryptoError::decryption(format!(
                "ciphertext too short ({} bytes)",
                envelope.len()
            )));
        }

        let (header, sealed) = envelope.split_at(HEADER_LEN);
        if header[0] != ENVELOPE_VERSION {
            return Err(CryptoError::decryption(format!(
                "unsupported envelope version {}",
                header[0]
            )));
        }

        self.cipher
            .decrypt(Nonce::from_slice(&header[1..]), sealed)
            .map_err(|_| CryptoError::decryption("wrong passphrase or corrupted data"))
    }

    /// Open an envelope and parse it as a JSON object
    pub fn decrypt(&self, envelope: &[u8]) -> CryptoResult<PayloadMap> {
        let plaintext = Zeroizing::new(self.open(envelope)?);

        let value: Value = serde_json::from_slice(&plaintext)
            .map_err(|e| CryptoError::decryption(format!("payload is not valid JSON: {e}")))?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(CryptoError::decryption(format!(
                "payload is not a JSON object (found {})",
                json_kind(&other)
            ))),
        }
    }
}

/// Encrypt a payload with a one-off cipher
///
/// Prefer holding a [`RecordCipher`] when sealing many records.
pub fn encrypt<T: Serialize + ?Sized>(key: &DerivedKey, payload: &T) -> CryptoResult<Vec<u8>> {
    RecordCipher::new(key)?.encrypt(payload)
}

/// Decrypt a payload with a one-off cipher
pub fn decrypt(key: &DerivedKey, ciphertext: &[u8]) -> CryptoResult<PayloadMap> {
    RecordCipher::new(key)?.decrypt(ciphertext)
}

/// Canonical byte encoding of a payload
///
/// Compact JSON with object keys sorted recursively, so the same logical
/// payload always encodes to the same bytes regardless of field declaration
/// order or map implementation.
pub fn canonical_json<T: Serialize + ?Sized>(payload: &T) -> CryptoResult<Vec<u8>> {
    let value = serde_json::to_value(payload)
        .map_err(|e| CryptoError::invalid_input(format!("payload is not serializable: {e}")))?;

    if !value.is_object() {
        return Err(CryptoError::invalid_input(format!(
            "payload must be a JSON object (found {})",
            json_kind(&value)
        )));
    }

    serde_json::to_vec(&sort_keys(value))
        .map_err(|e| CryptoError::Encryption(format!("payload encoding failed: {e}")))
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
