// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable names.
pub mod vars {
    pub const LIFELINE_STATE_DIR: &str = "LIFELINE_STATE_DIR";
    pub const XDG_STATE_HOME: &str = "XDG_STATE_HOME";
}

/// Returns the value of `LIFELINE_STATE_DIR` if set and non-empty.
pub fn state_dir() -> Option<PathBuf> {
    non_empty(vars::LIFELINE_STATE_DIR)
}

/// Returns the value of `XDG_STATE_HOME` if set and non-empty.
pub fn xdg_state_home() -> Option<PathBuf> {
    non_empty(vars::XDG_STATE_HOME)
}

fn non_empty(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Resolve the state directory from the `--state-dir` flag and the environment.
pub fn resolve_state_dir(flag: Option<&Path>) -> Result<PathBuf> {
    pick_state_dir(
        flag.map(Path::to_path_buf),
        state_dir(),
        xdg_state_home(),
        dirs::home_dir(),
    )
}

/// Precedence: flag, `LIFELINE_STATE_DIR`, `$XDG_STATE_HOME/lifeline`,
/// `~/.local/state/lifeline`.
pub(crate) fn pick_state_dir(
    flag: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    xdg: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    flag.or(env_dir)
        .or_else(|| xdg.map(|x| x.join("lifeline")))
        .or_else(|| home.map(|h| h.join(".local/state/lifeline")))
        .ok_or_else(|| {
            Error::Config(format!(
                "cannot determine state directory\n  hint: pass --state-dir or set {}",
                vars::LIFELINE_STATE_DIR
            ))
        })
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
