// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::action::{timestamp_from_ms, ActionKind};
use serde_json::json;
use tempfile::tempdir;
use yare::parameterized;

#[test]
fn auto_prefers_transactional_store() {
    let dir = tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());

    let store = open_store(&paths, BackendPreference::Auto).unwrap();

    assert_eq!(store.backend(), Backend::Transactional);
    assert!(paths.database.exists());
}

#[test]
fn auto_falls_back_when_database_cannot_be_created() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let paths = StorePaths {
        database: blocker.join("outbox.db"),
        fallback: dir.path().join("outbox-fallback.json"),
    };

    let mut store = open_store(&paths, BackendPreference::Auto).unwrap();
    assert_eq!(store.backend(), Backend::Fallback);

    let new = NewAction::new(ActionKind::ShortageReport, json!({"item": "arroz"}));
    let stored = store.append(&new, timestamp_from_ms(1)).unwrap();
    assert_eq!(store.list_all().unwrap(), vec![stored]);
    assert!(paths.fallback.exists());
}

#[test]
fn forced_fallback_never_touches_database() {
    let dir = tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());

    let store = open_store(&paths, BackendPreference::Fallback).unwrap();

    assert_eq!(store.backend(), Backend::Fallback);
    assert!(!paths.database.exists());
}

#[test]
fn store_paths_in_dir_uses_standard_names() {
    let paths = StorePaths::in_dir(Path::new("/var/lib/outbox"));
    assert_eq!(paths.database, Path::new("/var/lib/outbox/outbox.db"));
    assert_eq!(
        paths.fallback,
        Path::new("/var/lib/outbox/outbox-fallback.json")
    );
}

#[parameterized(
    auto = { "auto", BackendPreference::Auto },
    fallback = { "fallback", BackendPreference::Fallback },
    upper = { "FALLBACK", BackendPreference::Fallback },
)]
fn backend_preference_from_str(input: &str, expected: BackendPreference) {
    assert_eq!(input.parse::<BackendPreference>().unwrap(), expected);
}

#[test]
fn backend_preference_rejects_unknown() {
    assert!(matches!(
        "indexeddb".parse::<BackendPreference>(),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn backend_display() {
    assert_eq!(Backend::Transactional.to_string(), "transactional");
    assert_eq!(Backend::Fallback.to_string(), "fallback");
}
