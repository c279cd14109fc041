// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Status and configuration specs.

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn status_with_nothing_reachable_is_offline() {
    let temp = offline_state();
    lifeline_in(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: offline"))
        .stdout(predicate::str::contains("Active: none"))
        .stdout(predicate::str::contains("Pending: 0"));
}

#[test]
fn status_json_snapshot() {
    let temp = offline_state();
    lifeline_in(temp.path())
        .args(["queue", "push", "1"])
        .assert()
        .success();

    let snapshot = json_output(lifeline_in(temp.path()).args(["status", "-o", "json"]));

    assert_eq!(snapshot["state"], "offline");
    assert_eq!(snapshot["transportOnline"], true);
    assert!(snapshot["activeEndpoint"].is_null());
    assert_eq!(snapshot["pending"], 1);
    assert!(snapshot["lastRefresh"].is_string());
}

#[test]
fn malformed_config_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "probe_timeout_ms = [").unwrap();

    lifeline_in(temp.path())
        .args(["servers", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn state_dir_from_environment() {
    let temp = TempDir::new().unwrap();
    lifeline()
        .args(["queue", "push", "\"A\""])
        .env("LIFELINE_STATE_DIR", temp.path())
        .assert()
        .success();

    assert!(temp.path().join("sync_queue.json").is_file());
}

#[test]
fn version_flag() {
    lifeline()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("lifeline "));
}
