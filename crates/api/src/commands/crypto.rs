//! Record crypto commands
//!
//! Pure functions over a caller-held key. They do not touch the database.

use cipherlog_common::crypto;
use cipherlog_common::DerivedKey;
use cipherlog_domain::{EventPayload, Result};
use serde::Serialize;

use crate::utils::command_helpers::execute_command;

/// Derive the record key for a passphrase and a database's params
///
/// Slow by design; derive once and keep the key for the session.
pub fn derive_key(passphrase: &str, salt: &[u8], iterations: u32) -> Result<DerivedKey> {
    execute_command("crypto::derive_key", || Ok(crypto::derive_key(passphrase, salt, iterations)?))
}

/// Encrypt a payload object into a ciphertext envelope
pub fn encrypt<T: Serialize + ?Sized>(key: &DerivedKey, payload: &T) -> Result<Vec<u8>> {
    execute_command("crypto::encrypt", || Ok(crypto::encrypt(key, payload)?))
}

/// Decrypt a ciphertext envelope back into its payload object
///
/// Wrong keys and tampered bytes both fail with `Decryption`; no partial
/// payload is ever returned.
pub fn decrypt(key: &DerivedKey, ciphertext: &[u8]) -> Result<EventPayload> {
    execute_command("crypto::decrypt", || {
        let fields = crypto::decrypt(key, ciphertext)?;
        Ok(EventPayload::new(fields))
    })
}
