//! Domain constants
//!
//! Centralized location for the names and defaults shared by every layer.

// Storage
pub const DEFAULT_DB_FILENAME: &str = "keystrokes.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// Key derivation
pub const MIN_KDF_ITERATIONS: u32 = 50_000;
pub const DEFAULT_KDF_ITERATIONS: u32 = 200_000;
pub const DEFAULT_SALT_LEN: usize = 16;
pub const MAX_SALT_LEN: usize = 64;

// Event classification
pub const EVENT_TYPE_KEY: &str = "key";

/// Input surface recorded in key event payloads when the caller has none
pub const DEFAULT_WIDGET: &str = "logger_text";

#[cfg(test)]
mod tests {
    use cipherlog_common::crypto;

    use super::*;

    /// Domain defaults must agree with the crypto primitives' own floor.
    #[test]
    fn kdf_constants_match_crypto_tier() {
        assert_eq!(MIN_KDF_ITERATIONS, crypto::MIN_KDF_ITERATIONS);
        assert_eq!(DEFAULT_KDF_ITERATIONS, crypto::DEFAULT_KDF_ITERATIONS);
        assert_eq!(DEFAULT_SALT_LEN, crypto::DEFAULT_SALT_LEN);
    }
}
