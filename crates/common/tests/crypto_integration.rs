//! Integration tests for crypto module
//!
//! Exercises the full derive -> seal -> open path the event log relies on:
//! a key re-derived from stored parameters must open records sealed by an
//! earlier derivation, and any other key must not.

#![cfg(feature = "runtime")]

use cipherlog_common::crypto::{
    canonical_json, decrypt, derive_key, encrypt, generate_salt, DEFAULT_SALT_LEN,
    MIN_KDF_ITERATIONS,
};
use cipherlog_common::{CryptoError, RecordCipher};
use serde_json::json;

/// Re-deriving with the same salt and iterations reproduces a key that opens
/// earlier records.
#[test]
fn rederived_key_opens_earlier_records() {
    let salt = generate_salt(DEFAULT_SALT_LEN);
    let payload = json!({"char": "h", "keysym": "h", "keycode": 43, "widget": "logger_text"});

    let writer_key = derive_key("correct-horse", &salt, MIN_KDF_ITERATIONS).expect("derive");
    let envelope = encrypt(&writer_key, &payload).expect("encrypt");

    let reader_key = derive_key("correct-horse", &salt, MIN_KDF_ITERATIONS).expect("re-derive");
    let decrypted = decrypt(&reader_key, &envelope).expect("decrypt with re-derived key");

    assert_eq!(serde_json::Value::Object(decrypted), payload);
    assert_eq!(writer_key.fingerprint(), reader_key.fingerprint());
}

/// A wrong passphrase or a different salt yields `Decryption`, never a
/// partial payload.
#[test]
fn wrong_passphrase_or_salt_is_rejected() {
    let salt = generate_salt(DEFAULT_SALT_LEN);
    let other_salt = generate_salt(DEFAULT_SALT_LEN);
    let payload = json!({"keysym": "Return", "keycode": 36});

    let key = derive_key("correct-horse", &salt, MIN_KDF_ITERATIONS).expect("derive");
    let envelope = encrypt(&key, &payload).expect("encrypt");

    let wrong_pass = derive_key("battery-staple", &salt, MIN_KDF_ITERATIONS).expect("derive");
    let wrong_salt = derive_key("correct-horse", &other_salt, MIN_KDF_ITERATIONS).expect("derive");

    assert!(matches!(decrypt(&wrong_pass, &envelope), Err(CryptoError::Decryption(_))));
    assert!(matches!(decrypt(&wrong_salt, &envelope), Err(CryptoError::Decryption(_))));
}

#[test]
fn one_cipher_seals_many_records() {
    let salt = generate_salt(DEFAULT_SALT_LEN);
    let key = derive_key("pw", &salt, MIN_KDF_ITERATIONS).expect("derive");
    let cipher = RecordCipher::new(&key).expect("cipher");

    let envelopes: Vec<Vec<u8>> = (0..16)
        .map(|code| cipher.encrypt(&json!({"keycode": code})).expect("encrypt"))
        .collect();

    for (code, envelope) in envelopes.iter().enumerate() {
        let map = cipher.decrypt(envelope).expect("decrypt");
        assert_eq!(map.get("keycode").and_then(|v| v.as_u64()), Some(code as u64));
    }
}

/// Field order in the caller's payload does not change the sealed bytes'
/// plaintext.
#[test]
fn canonical_encoding_is_order_independent() {
    let a = json!({"b": 1, "a": {"y": true, "x": null}});
    let b = json!({"a": {"x": null, "y": true}, "b": 1});

    assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
}
