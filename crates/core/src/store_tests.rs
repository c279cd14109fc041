// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use serde::Deserialize;
use tempfile::tempdir;
use yare::parameterized;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Sample {
    name: String,
    count: u32,
}

#[test]
fn file_store_missing_key_is_none() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    assert_eq!(store.get("servers").unwrap(), None);
}

#[test]
fn file_store_set_then_get() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    store.set("emergency", "{\"enabled\":true}").unwrap();

    assert_eq!(
        store.get("emergency").unwrap().as_deref(),
        Some("{\"enabled\":true}")
    );
    assert!(dir.path().join("emergency.json").exists());
    assert!(!dir.path().join("emergency.json.tmp").exists());
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempdir().unwrap();
    {
        let store = FileStore::open(dir.path()).unwrap();
        store.set("servers", "[]").unwrap();
    }
    let store = FileStore::open(dir.path()).unwrap();
    assert_eq!(store.get("servers").unwrap().as_deref(), Some("[]"));
}

#[test]
fn file_store_remove_absent_is_ok() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store.remove("never-written").unwrap();

    store.set("k", "v").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn file_store_creates_nested_dir() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = FileStore::open(&nested).unwrap();
    store.set("k", "v").unwrap();
    assert!(nested.join("k.json").exists());
}

#[parameterized(
    empty = { "" },
    traversal = { "../etc" },
    slash = { "a/b" },
    space = { "a b" },
)]
fn file_store_rejects_bad_keys(key: &str) {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    assert!(matches!(store.get(key), Err(Error::InvalidInput(_))));
}

#[test]
fn memory_store_roundtrip() {
    let store = MemoryStore::new();
    assert_eq!(store.get("k").unwrap(), None);
    store.set("k", "1").unwrap();
    store.set("k", "2").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn read_record_decodes_value() {
    let store = MemoryStore::new();
    let sample = Sample {
        name: "a".into(),
        count: 3,
    };
    write_record(&store, "sample", &sample).unwrap();

    let read: Option<Sample> = read_record(&store, "sample");
    assert_eq!(read, Some(sample));
}

#[test]
fn read_record_absent_is_none() {
    let store = MemoryStore::new();
    let read: Option<Sample> = read_record(&store, "sample");
    assert_eq!(read, None);
}

#[parameterized(
    truncated = { "{\"name\":\"a\"" },
    wrong_shape = { "[1,2,3]" },
    not_json = { "hello" },
)]
fn read_record_malformed_is_none(raw: &str) {
    let store = MemoryStore::new();
    store.set("sample", raw).unwrap();
    let read: Option<Sample> = read_record(&store, "sample");
    assert_eq!(read, None);
}

#[test]
fn file_store_concurrent_writers_never_collide() {
    let dir = tempdir().unwrap();
    let first = FileStore::open(dir.path()).unwrap();
    let second = FileStore::open(dir.path()).unwrap();

    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 0..100 {
                first.set("shared", &format!("\"first-{}\"", i)).unwrap();
            }
        });
        s.spawn(|| {
            for i in 0..100 {
                second.set("shared", &format!("\"second-{}\"", i)).unwrap();
            }
        });
    });

    let last: Option<String> = read_record(&first, "shared");
    let last = last.unwrap();
    assert!(last == "first-99" || last == "second-99", "unexpected value {}", last);
}

#[test]
fn file_store_lock_excludes_other_handles() {
    let dir = tempdir().unwrap();
    let first = FileStore::open(dir.path()).unwrap();
    let second = FileStore::open(dir.path()).unwrap();
    let held = first.lock("servers").unwrap();

    let lock_path = dir.path().join("servers.lock");
    let other_handle = std::fs::OpenOptions::new().write(true).open(&lock_path).unwrap();
    assert!(fs2::FileExt::try_lock_exclusive(&other_handle).is_err());

    drop(held);
    let _again = second.lock("servers").unwrap();
}

#[test]
fn file_store_leaves_no_temp_files() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store.set("servers", "[]").unwrap();
    store.set("servers", "[1]").unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["servers.json".to_string()]);
}
