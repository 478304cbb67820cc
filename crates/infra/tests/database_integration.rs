//! End-to-end database integration coverage for the SQLite stores.
//!
//! Each test runs against an isolated database file in a temporary
//! directory and goes through the same port traits the core service uses.

mod support;

use std::sync::{Arc, Barrier};
use std::thread;

use cipherlog_common::crypto::{decrypt, derive_key, encrypt};
use cipherlog_core::{CryptoParamsStore, EventLogService, EventLogStore};
use cipherlog_domain::{IndexFields, KeyEventPayload};
use serde_json::json;
use support::TestDatabase;

#[test]
fn get_or_create_twice_returns_identical_params() {
    let harness = TestDatabase::new();
    let store = harness.params_store();

    let first = store.get_or_create(&harness.path).expect("create");
    let second = store.get_or_create(&harness.path).expect("read back");

    assert_eq!(first, second);
    assert_eq!(store.get_existing(&harness.path).expect("lookup"), Some(first));
}

/// Validates that read paths have no side effects.
///
/// Assertions:
/// - `get_existing`, `fetch` and `count` on an untouched path succeed with
///   empty results.
/// - The database file is still absent afterwards.
#[test]
fn reads_on_untouched_path_create_nothing() {
    let harness = TestDatabase::new();

    assert_eq!(harness.params_store().get_existing(&harness.path).expect("lookup"), None);
    assert!(harness.log_store().fetch(&harness.path, None).expect("fetch").is_empty());
    assert_eq!(harness.log_store().count(&harness.path).expect("count"), 0);
    assert!(!harness.path.exists());
}

/// Concurrent creators on a fresh file converge on a single meta row.
#[test]
fn concurrent_get_or_create_yields_one_row() {
    let harness = TestDatabase::new();
    let store = Arc::new(harness.params_store());
    let path = Arc::new(harness.path.clone());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let path = Arc::clone(&path);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.get_or_create(&path).expect("get_or_create under contention")
            })
        })
        .collect();

    let results: Vec<_> =
        handles.into_iter().map(|h| h.join().expect("creator thread")).collect();

    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));

    let conn = harness.manager.open(&harness.path).expect("open");
    let rows: i64 = conn.query_row("SELECT COUNT(*) FROM meta", &[], |row| row.get(0)).expect("count");
    assert_eq!(rows, 1);
}

#[test]
fn separate_databases_get_distinct_salts() {
    let a = TestDatabase::new();
    let b = TestDatabase::new();

    let pa = a.params_store().get_or_create(&a.path).expect("a");
    let pb = b.params_store().get_or_create(&b.path).expect("b");

    assert_ne!(pa.salt, pb.salt);
}

#[test]
fn appended_records_come_back_newest_first_with_limit() {
    let harness = TestDatabase::new();
    let log = harness.log_store();

    for (n, ts) in ["2024-01-01T00:00:01Z", "2024-01-01T00:00:03Z", "2024-01-01T00:00:02Z"]
        .iter()
        .enumerate()
    {
        log.append(&harness.path, ts, "key", &IndexFields::new(format!("k{n}"), n as i64), b"ct")
            .expect("append");
    }

    let all = log.fetch(&harness.path, None).expect("fetch all");
    let stamps: Vec<&str> = all.iter().map(|r| r.timestamp.as_str()).collect();
    assert_eq!(stamps, vec!["2024-01-01T00:00:03Z", "2024-01-01T00:00:02Z", "2024-01-01T00:00:01Z"]);

    let newest = log.fetch(&harness.path, Some(2)).expect("fetch limited");
    assert_eq!(newest.len(), 2);
    assert_eq!(newest[0].index_fields, IndexFields::new("k1", 1));
    assert_eq!(log.count(&harness.path).expect("count"), 3);
}

/// Stored bytes are exactly what was appended; plaintext payload fields never
/// reach the table.
#[test]
fn ciphertext_is_stored_verbatim_and_payload_stays_sealed() {
    let harness = TestDatabase::new();
    let params = harness.params_store().get_or_create(&harness.path).expect("params");
    let key = derive_key("correct-horse", &params.salt, params.kdf_iterations).expect("key");

    let payload = json!({"char": "z", "keysym": "secret-keysym-marker", "keycode": 52, "widget": "logger_text"});
    let ciphertext = encrypt(&key, &payload).expect("encrypt");

    let log = harness.log_store();
    log.append(&harness.path, "2024-01-01T00:00:00Z", "key", &IndexFields::new("z", 52), &ciphertext)
        .expect("append");

    let stored = log.fetch(&harness.path, None).expect("fetch");
    assert_eq!(stored[0].ciphertext, ciphertext);
    assert_eq!(serde_json::Value::Object(decrypt(&key, &stored[0].ciphertext).expect("decrypt")), payload);

    let raw = std::fs::read(&harness.path).expect("raw file");
    let marker = b"secret-keysym-marker";
    assert!(!raw.windows(marker.len()).any(|w| w == marker));
}

#[test]
fn service_over_sqlite_stores_round_trips_key_events() {
    let harness = TestDatabase::new();
    let service = EventLogService::new(Arc::new(harness.params_store()), Arc::new(harness.log_store()));

    let writer = service.open_for_writing(&harness.path, "correct-horse").expect("writer");
    let event = KeyEventPayload::from_key(Some("a"), "a", Some(97));
    writer
        .append_payload("2024-01-01T00:00:00Z", "key", &event.index_fields(), &event)
        .expect("append");

    let reader = service
        .open_for_reading(&harness.path, "correct-horse")
        .expect("reader")
        .expect("params exist");
    let loaded = reader.load(None).expect("load");

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].payload.as_key_event(), Some(event));

    let wrong = service
        .open_for_reading(&harness.path, "wrong-password")
        .expect("reader")
        .expect("params exist");
    assert!(wrong.load(None).expect_err("wrong key").is_decryption());
}
