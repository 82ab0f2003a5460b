// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use tempfile::tempdir;

fn shortage(item: &str) -> NewAction {
    NewAction::new(ActionKind::ShortageReport, json!({ "item": item }))
}

fn at(ms: u64) -> DateTime<Utc> {
    timestamp_from_ms(ms)
}

#[test]
fn append_assigns_increasing_ids() {
    let mut store = SqliteStore::open_in_memory().unwrap();

    let a = store.append(&shortage("arroz"), at(1000)).unwrap();
    let b = store.append(&shortage("feijão"), at(1000)).unwrap();

    assert!(b.id > a.id);
    assert_eq!(store.backend(), Backend::Transactional);
}

#[test]
fn list_all_preserves_insertion_order() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    for (i, item) in ["a", "b", "c", "d"].iter().enumerate() {
        store.append(&shortage(item), at(5000 - i as u64)).unwrap();
    }

    let items: Vec<_> = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|a| a.payload["item"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(items, vec!["a", "b", "c", "d"]);
}

#[test]
fn list_round_trips_fields() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let new = NewAction::new(
        ActionKind::ChecklistProgress,
        json!({"id": "abertura", "steps": [1, 2, 3], "done": false}),
    );
    let stored = store.append(&new, at(1_700_000_000_456)).unwrap();

    let listed = store.list_all().unwrap();
    assert_eq!(listed, vec![stored]);
    assert_eq!(listed[0].created_at.timestamp_millis(), 1_700_000_000_456);
}

#[test]
fn delete_by_id_removes_only_that_record() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let a = store.append(&shortage("a"), at(1)).unwrap();
    let b = store.append(&shortage("b"), at(2)).unwrap();

    store.delete_by_id(a.id).unwrap();

    let remaining = store.list_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);
}

#[test]
fn delete_unknown_id_is_noop() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.append(&shortage("a"), at(1)).unwrap();

    store.delete_by_id(ActionId::new(999)).unwrap();
    store.delete_by_id(ActionId::new(999)).unwrap();

    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn ids_are_not_reused_after_clear() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let first = store.append(&shortage("a"), at(1)).unwrap();
    assert_eq!(store.clear().unwrap(), 1);
    assert!(store.list_all().unwrap().is_empty());

    let second = store.append(&shortage("b"), at(2)).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn records_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("outbox.db");

    {
        let mut store = SqliteStore::open(&path).unwrap();
        store.append(&shortage("arroz"), at(1)).unwrap();
        store.append(&shortage("feijão"), at(2)).unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1].payload["item"], "feijão");
}

#[test]
fn open_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("state").join("outbox.db");

    SqliteStore::open(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn open_fails_when_parent_is_a_file() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let result = SqliteStore::open(&blocker.join("outbox.db"));
    assert!(matches!(result, Err(Error::StoreUnavailable(_))));
}

#[test]
fn open_fails_on_non_database_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("outbox.db");
    std::fs::write(&path, "this is definitely not an sqlite database file ".repeat(20)).unwrap();

    let result = SqliteStore::open(&path);
    assert!(matches!(result, Err(Error::StoreUnavailable(_))));
}

#[test]
fn unknown_type_in_row_is_an_error() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store
        .conn
        .execute(
            "INSERT INTO queue (type, payload, created_at) VALUES ('telemetry', '{}', 0)",
            [],
        )
        .unwrap();

    assert!(store.list_all().is_err());
}
