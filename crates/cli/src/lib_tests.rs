// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Tests for the public `run()` function.
//!
//! Commands that probe or replay need real servers and are covered by the
//! CLI specs; these exercise routing for the purely local commands.

use super::*;
use tempfile::TempDir;

fn cli(dir: &TempDir, command: Command) -> Cli {
    Cli {
        state_dir: Some(dir.path().to_path_buf()),
        verbose: false,
        command,
    }
}

#[test]
fn run_routes_servers_add_and_remove() {
    let dir = TempDir::new().unwrap();
    run(cli(
        &dir,
        Command::Servers(ServersCommand::Add {
            name: "Backup".to_string(),
            url: "http://backup.test".to_string(),
            class: lifeline_core::EndpointClass::Fallback,
            priority: 4,
        }),
    ))
    .unwrap();

    let ctx = Context::open(dir.path()).unwrap();
    let endpoints = ctx.manager.registry().list();
    assert_eq!(endpoints.len(), 2);
    let added = endpoints.iter().find(|e| e.name == "Backup").unwrap();
    assert!(added.id.starts_with("srv-"));

    run(cli(
        &dir,
        Command::Servers(ServersCommand::Remove {
            id: added.id.clone(),
        }),
    ))
    .unwrap();
    assert_eq!(Context::open(dir.path()).unwrap().manager.registry().list().len(), 1);
}

#[test]
fn run_rejects_invalid_url() {
    let dir = TempDir::new().unwrap();
    let err = run(cli(
        &dir,
        Command::Servers(ServersCommand::Add {
            name: "Bad".to_string(),
            url: "localhost:9".to_string(),
            class: lifeline_core::EndpointClass::Primary,
            priority: 0,
        }),
    ))
    .unwrap_err();

    assert!(matches!(err, Error::Core(lifeline_core::Error::InvalidUrl(_))));
}

#[test]
fn run_rejects_empty_edit() {
    let dir = TempDir::new().unwrap();
    let err = run(cli(
        &dir,
        Command::Servers(ServersCommand::Edit {
            id: lifeline_core::DEFAULT_ENDPOINT_ID.to_string(),
            name: None,
            url: None,
            class: None,
            priority: None,
        }),
    ))
    .unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn run_queue_push_rejects_bad_json() {
    let dir = TempDir::new().unwrap();
    let err = run(cli(
        &dir,
        Command::Queue(QueueCommand::Push {
            payload: "{not json".to_string(),
        }),
    ))
    .unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(Context::open(dir.path()).unwrap().manager.queue().is_empty());
}

#[test]
fn run_emergency_set_persists() {
    let dir = TempDir::new().unwrap();
    run(cli(
        &dir,
        Command::Emergency(EmergencyCommand::Set {
            enabled: Some(true),
            offline: None,
            low_bandwidth: Some(true),
            p2p: None,
        }),
    ))
    .unwrap();

    let config = Context::open(dir.path()).unwrap().manager.emergency();
    assert!(config.enabled);
    assert!(config.low_bandwidth_mode);
    assert!(!config.offline_mode);
}

#[test]
fn run_routes_queue_push_and_clear() {
    let dir = TempDir::new().unwrap();
    run(cli(
        &dir,
        Command::Queue(QueueCommand::Push {
            payload: r#"{"text":"hi"}"#.to_string(),
        }),
    ))
    .unwrap();
    assert_eq!(Context::open(dir.path()).unwrap().manager.queue().pending_count(), 1);

    run(cli(&dir, Command::Queue(QueueCommand::Clear))).unwrap();
    assert!(Context::open(dir.path()).unwrap().manager.queue().is_empty());
}
