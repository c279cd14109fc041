// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Url nothing listens on; connections are refused immediately.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

pub fn lifeline() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("lifeline").unwrap()
}

/// `lifeline --state-dir <dir> <args...>`, isolated from the user's environment.
pub fn lifeline_in(dir: &Path) -> Command {
    let mut cmd = lifeline();
    cmd.arg("--state-dir")
        .arg(dir)
        .env_remove("LIFELINE_STATE_DIR")
        .env("RUST_LOG", "warn");
    cmd
}

/// A state directory whose default endpoint is unreachable and probes fast.
pub fn offline_state() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("config.toml"),
        format!(
            "probe_timeout_ms = 500\n\n[default_endpoint]\nurl = \"{}\"\n",
            UNREACHABLE_URL
        ),
    )
    .unwrap();
    temp
}

/// Parse stdout of a successful `-o json` invocation.
pub fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}
