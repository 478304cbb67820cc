//! Passphrase-based key derivation
//!
//! PBKDF2-HMAC-SHA256 producing a 32-byte AES-256 key. Derivation is
//! deterministic for a given `(passphrase, salt, iterations)` so a key
//! re-derived from stored parameters reproduces the original.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use tracing::{debug, instrument};
use zeroize::Zeroize;

use super::error::{CryptoError, CryptoResult};
use super::key::{DerivedKey, KEY_LEN};

/// Hard floor on the PBKDF2 work factor
pub const MIN_KDF_ITERATIONS: u32 = 50_000;

/// Work factor stored for newly created databases
pub const DEFAULT_KDF_ITERATIONS: u32 = 200_000;

/// Salt length for newly created databases
pub const DEFAULT_SALT_LEN: usize = 16;

/// Derive a record key from a passphrase
///
/// # Errors
/// Returns [`CryptoError::InvalidInput`] if the passphrase or salt is empty,
/// or if `iterations` is below [`MIN_KDF_ITERATIONS`].
#[instrument(skip(passphrase, salt), fields(salt_len = salt.len()))]
pub fn derive_key(passphrase: &str, salt: &[u8], iterations: u32) -> CryptoResult<DerivedKey> {
    if passphrase.is_empty() {
        return Err(CryptoError::invalid_input("passphrase is required"));
    }
    if salt.is_empty() {
        return Err(CryptoError::invalid_input("salt is required"));
    }
    if iterations < MIN_KDF_ITERATIONS {
        return Err(CryptoError::invalid_input(format!(
            "kdf iterations {iterations} below minimum {MIN_KDF_ITERATIONS}"
        )));
    }

    let key = pbkdf2_sha256(passphrase.as_bytes(), salt, iterations)?;
    debug!(fingerprint = %key.fingerprint(), "record key derived");
    Ok(key)
}

/// Generate a fresh random salt from the OS RNG
pub fn generate_salt(len: usize) -> Vec<u8> {
    let mut salt = vec![0u8; len];
    OsRng.fill_bytes(&mut salt);
    salt
}

fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> CryptoResult<DerivedKey> {
    let mut out = [0u8; KEY_LEN];
    pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut out)
        .map_err(|e| CryptoError::Encryption(format!("PBKDF2 failed: {e}")))?;

    let key = DerivedKey::from_bytes(out);
    out.zeroize();
    Ok(key)
}
