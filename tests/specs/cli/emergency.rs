// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Emergency override specs.

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn defaults_to_all_off() {
    let temp = TempDir::new().unwrap();
    let config = json_output(lifeline_in(temp.path()).args(["emergency", "show", "-o", "json"]));

    assert_eq!(
        config,
        serde_json::json!({
            "enabled": false,
            "offlineMode": false,
            "lowBandwidthMode": false,
            "p2pEnabled": false
        })
    );
}

#[test]
fn corrupt_record_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("emergency.json"), "{ not json").unwrap();

    lifeline_in(temp.path())
        .args(["emergency", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled: false"))
        .stdout(predicate::str::contains("offline: false"));
}

#[test]
fn deleted_record_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    lifeline_in(temp.path())
        .args(["emergency", "set", "--enabled", "true"])
        .assert()
        .success();
    std::fs::remove_file(temp.path().join("emergency.json")).unwrap();

    lifeline_in(temp.path())
        .args(["emergency", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled: false"));
}

#[test]
fn set_changes_only_named_flags() {
    let temp = TempDir::new().unwrap();
    lifeline_in(temp.path())
        .args(["emergency", "set", "--enabled", "true", "--p2p", "true"])
        .assert()
        .success();
    lifeline_in(temp.path())
        .args(["emergency", "set", "--offline", "true"])
        .assert()
        .success();

    let config = json_output(lifeline_in(temp.path()).args(["emergency", "show", "-o", "json"]));
    assert_eq!(config["enabled"], true);
    assert_eq!(config["offlineMode"], true);
    assert_eq!(config["lowBandwidthMode"], false);
    assert_eq!(config["p2pEnabled"], true);
}

#[test]
fn offline_mode_shows_in_status() {
    let temp = offline_state();
    lifeline_in(temp.path())
        .args(["emergency", "set", "--offline", "true"])
        .assert()
        .success();

    lifeline_in(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: offline"))
        .stdout(predicate::str::contains("Emergency: offline mode"));
}
