//! Item store behavior against failing and counting storage ports.

use cradle_rs_store::{FileStorage, ItemStore, KeyValueStorage, Record};
use cradle_rs_test_utils::{CountingStorage, FailingStorage, fields, name_fields};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

/// Bulk operations write the partition once per call.
#[test]
fn bulk_operations_persist_once() {
    let storage = Arc::new(CountingStorage::new());
    let mut store = ItemStore::open("names", storage.clone(), None);

    let created = store.bulk_add(vec![
        name_fields("Ava", "girl"),
        name_fields("Leo", "boy"),
        name_fields("Mia", "girl"),
    ]);
    assert_eq!(storage.writes(), 1);

    let ids: Vec<String> = created.iter().map(|record| record.id.clone()).collect();
    assert_eq!(store.bulk_delete(&ids), 3);
    assert_eq!(storage.writes(), 2);
    assert_eq!(storage.written_keys(), vec!["names", "names"]);
}

/// Nothing is written for empty batches or unknown ids.
#[test]
fn noop_mutations_skip_storage() {
    let storage = Arc::new(CountingStorage::new());
    let mut store = ItemStore::open("names", storage.clone(), None);

    assert!(store.bulk_add(Vec::new()).is_empty());
    assert_eq!(store.bulk_delete(["missing"]), 0);
    assert!(!store.delete("missing"));
    assert_eq!(store.update("missing", name_fields("Ava", "girl")), None);
    assert_eq!(storage.writes(), 0);
}

/// A failed write keeps the in-memory change and reports the issue.
#[test]
fn persist_failure_keeps_in_memory_state() {
    let storage = Arc::new(FailingStorage::read_only());
    let mut store = ItemStore::open("favorites", storage.clone(), None);

    let record = store.add(name_fields("Ava", "girl"));
    assert_eq!(store.get(&record.id), Some(&record));
    let issue = store.take_issue().expect("persist issue");
    assert!(issue.is_persist_failure());
    assert_eq!(storage.raw("favorites"), None);

    storage.set_fail_writes(false);
    let second = store.add(name_fields("Leo", "boy"));
    assert!(store.issue().is_none());
    let raw = storage.raw("favorites").expect("persisted");
    let persisted: Vec<Record> = serde_json::from_str(&raw).expect("decode");
    assert_eq!(persisted, vec![record, second]);
}

/// Unreadable storage yields an empty store plus a load issue.
#[test]
fn read_failure_falls_back_to_empty() {
    let storage = Arc::new(FailingStorage::unreadable());
    let seed = Record::new(name_fields("Seed", "girl"), chrono::Utc::now());
    let store = ItemStore::open("names", storage, Some(vec![seed]));
    assert!(store.is_empty());
    assert!(store.issue().expect("issue").is_load_failure());
}

/// Stored JSON that is valid but not a record array is a load failure.
#[test]
fn wrong_shape_is_load_failure() {
    let storage = Arc::new(FailingStorage::new());
    storage
        .set("names", r#"{"id": "not-an-array"}"#)
        .expect("seed raw");
    let store = ItemStore::open("names", storage, None);
    assert!(store.is_empty());
    assert!(store.issue().expect("issue").is_load_failure());
}

/// Partition state survives a full serialize/deserialize cycle on disk.
#[test]
fn file_storage_round_trip() {
    let temp = tempdir().expect("tempdir");
    let storage = Arc::new(FileStorage::new(temp.path()).expect("storage"));
    let mut store = ItemStore::open("names", storage.clone(), None);
    store.add(fields(json!({
        "name": "Aurora",
        "rank": 17,
        "popularity": 0.82,
        "featured": false,
        "tags": ["celestial", "classic"],
        "details": { "origin": "Latin", "meaning": "dawn" },
        "nickname": null
    })));
    store.add(name_fields("Felix", "boy"));

    let reopened = ItemStore::open("names", storage, None);
    assert_eq!(reopened.items(), store.items());
    assert!(reopened.issue().is_none());
}

/// Floats whose shortest decimal form is hard to parse come back bit-exact.
#[test]
fn float_fields_read_back_exactly() {
    let storage = Arc::new(CountingStorage::new());
    let mut store = ItemStore::open("scores", storage.clone(), None);
    let values = [958.7872702291189_f64, 105.00455722256841, 948.1570359895733];
    for value in values {
        store.add(fields(json!({ "score": value })));
    }

    let reopened = ItemStore::open("scores", storage, None);
    let scores: Vec<f64> = reopened
        .items()
        .iter()
        .filter_map(|record| record.field("score").and_then(|score| score.as_f64()))
        .collect();
    assert_eq!(scores, values.to_vec());
    assert_eq!(reopened.items(), store.items());
}

/// A load failure is still reported after a later write also fails.
#[test]
fn load_failure_is_not_hidden_by_persist_failure() {
    let storage = Arc::new(FailingStorage::new());
    storage.set_fail_reads(true);
    storage.set_fail_writes(true);
    let mut store = ItemStore::open("names", storage, None);
    store.add(name_fields("Ava", "girl"));

    assert!(store.take_issue().expect("load issue").is_load_failure());
    assert!(store.take_issue().expect("persist issue").is_persist_failure());
    assert!(store.take_issue().is_none());
}

/// Partitions sharing one storage port stay independent.
#[test]
fn partitions_are_isolated() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(CountingStorage::new());
    let mut names = ItemStore::open("names", storage.clone(), None);
    let mut favorites = ItemStore::open("favorites", storage.clone(), None);

    names.add(name_fields("Ava", "girl"));
    favorites.add(name_fields("Leo", "boy"));
    favorites.add(name_fields("Mia", "girl"));

    assert_eq!(ItemStore::open("names", storage.clone(), None).len(), 1);
    assert_eq!(ItemStore::open("favorites", storage, None).len(), 2);
}
