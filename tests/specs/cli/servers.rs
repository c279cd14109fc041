// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoint registry specs.

#![allow(clippy::unwrap_used)]

use super::common::*;
use yare::parameterized;

fn added_id(dir: &TempDir, name: &str, url: &str) -> String {
    let list = json_output(lifeline_in(dir.path()).args(["servers", "list", "-o", "json"]));
    let before: Vec<String> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect();

    lifeline_in(dir.path())
        .args(["servers", "add", name, url])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Added srv-"));

    let list = json_output(lifeline_in(dir.path()).args(["servers", "list", "-o", "json"]));
    list.as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .find(|id| !before.contains(id))
        .unwrap()
}

#[test]
fn fresh_state_lists_builtin_default() {
    let temp = TempDir::new().unwrap();
    lifeline_in(temp.path())
        .args(["servers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default  Primary  http://localhost:54321"));
}

#[test]
fn list_json_uses_camel_case_fields() {
    let temp = TempDir::new().unwrap();
    let list = json_output(lifeline_in(temp.path()).args(["servers", "list", "-o", "json"]));

    let first = &list[0];
    assert_eq!(first["id"], "default");
    assert_eq!(first["class"], "primary");
    assert_eq!(first["status"], "checking");
    assert!(first.get("latencyMs").is_some());
}

#[test]
fn add_then_list_shows_checking_endpoint() {
    let temp = TempDir::new().unwrap();
    lifeline_in(temp.path())
        .args([
            "servers",
            "add",
            "Backup",
            "https://backup.example.org",
            "--class",
            "fallback",
            "--priority",
            "3",
        ])
        .assert()
        .success();

    lifeline_in(temp.path())
        .args(["servers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Backup  https://backup.example.org  fallback  checking  -  p3",
        ));
}

#[test]
fn added_endpoint_survives_restart_and_can_be_removed() {
    let temp = TempDir::new().unwrap();
    let id = added_id(&temp, "Backup", "https://backup.example.org");

    lifeline_in(temp.path())
        .args(["servers", "remove", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Removed {}", id)));

    lifeline_in(temp.path())
        .args(["servers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup").not());
}

#[test]
fn remove_unknown_id_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    lifeline_in(temp.path())
        .args(["servers", "remove", "srv-00000000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing removed"));
}

#[test]
fn edit_changes_fields_but_not_id() {
    let temp = TempDir::new().unwrap();
    let id = added_id(&temp, "Backup", "https://backup.example.org");

    lifeline_in(temp.path())
        .args(["servers", "edit", id.as_str(), "--name", "Standby", "--priority", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("{}  Standby", id)));
}

#[test]
fn edit_unknown_id_fails() {
    let temp = TempDir::new().unwrap();
    lifeline_in(temp.path())
        .args(["servers", "edit", "srv-00000000", "--name", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("srv-00000000"));
}

#[parameterized(
    no_scheme = { "backup.example.org" },
    ftp = { "ftp://backup.example.org" },
    bare_scheme = { "http://" },
)]
fn add_rejects_invalid_url(url: &str) {
    let temp = TempDir::new().unwrap();
    lifeline_in(temp.path())
        .args(["servers", "add", "Bad", url])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn check_marks_unreachable_endpoint_offline() {
    let temp = offline_state();
    lifeline_in(temp.path())
        .args(["servers", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("offline  failed"))
        .stdout(predicate::str::contains("Best: none reachable"));
}
