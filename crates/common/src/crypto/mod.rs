//! Cryptographic primitives for the encrypted event log.
//!
//! - [`kdf`]: PBKDF2-HMAC-SHA256 passphrase → key derivation
//! - [`key`]: [`DerivedKey`], a zeroizing 256-bit key container
//! - [`cipher`]: [`RecordCipher`], AES-256-GCM sealing of structured payloads
//!
//! Everything here is pure: no I/O, no global state. Key material never
//! appears in `Debug` output or logs; only [`DerivedKey::fingerprint`] does.

pub mod cipher;
pub mod error;
pub mod kdf;
pub mod key;

pub use cipher::{canonical_json, decrypt, encrypt, PayloadMap, RecordCipher};
pub use error::{CryptoError, CryptoResult};
pub use kdf::{
    derive_key, generate_salt, DEFAULT_KDF_ITERATIONS, DEFAULT_SALT_LEN, MIN_KDF_ITERATIONS,
};
pub use key::{DerivedKey, KEY_LEN};
