// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the lifeline library.
///
/// Network failures never appear here: probes and replays degrade to status
/// values. These are the conditions a caller can act on.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] lifeline_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("http client error: {0}")]
    Http(String),

    #[error("no active endpoint: the monitor is not online\n  hint: run 'lifeline status' to see endpoint health")]
    NoActiveEndpoint,

    #[error("another monitor is already running for {0}\n  hint: only one 'lifeline watch' may run per state directory")]
    LockHeld(String),

    #[error("{0}")]
    InvalidInput(String),
}

/// A specialized Result type for lifeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
