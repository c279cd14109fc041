// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline sync queue specs.

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn empty_queue() {
    let temp = TempDir::new().unwrap();
    lifeline_in(temp.path())
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queue is empty."));
}

#[test]
fn pushed_items_are_listed_in_order() {
    let temp = TempDir::new().unwrap();
    for (i, payload) in [r#"{"n":"A"}"#, r#"{"n":"B"}"#, r#"{"n":"C"}"#]
        .iter()
        .enumerate()
    {
        lifeline_in(temp.path())
            .args(["queue", "push", *payload])
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("({} pending)", i + 1)));
    }

    let items = json_output(lifeline_in(temp.path()).args(["queue", "list", "-o", "json"]));
    let names: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["payload"]["n"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(items[0]["retryCount"], 0);
    assert!(items[0]["id"].as_str().unwrap().starts_with("q-"));
}

#[test]
fn push_rejects_invalid_json() {
    let temp = TempDir::new().unwrap();
    lifeline_in(temp.path())
        .args(["queue", "push", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("payload is not valid JSON"));
}

#[test]
fn drain_without_reachable_endpoint_fails_and_keeps_queue() {
    let temp = offline_state();
    lifeline_in(temp.path())
        .args(["queue", "push", "\"A\""])
        .assert()
        .success();

    lifeline_in(temp.path())
        .args(["queue", "drain"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no active endpoint"));

    let items = json_output(lifeline_in(temp.path()).args(["queue", "list", "-o", "json"]));
    assert_eq!(items.as_array().unwrap().len(), 1);
}

#[test]
fn clear_discards_everything_queued() {
    let temp = TempDir::new().unwrap();
    for payload in ["\"A\"", "\"B\""] {
        lifeline_in(temp.path())
            .args(["queue", "push", payload])
            .assert()
            .success();
    }

    lifeline_in(temp.path())
        .args(["queue", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Discarded 2 queued item(s)"));

    lifeline_in(temp.path())
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queue is empty."));
}
