// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lifeline-core operations.

use thiserror::Error;

/// All possible errors that can occur in lifeline-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("endpoint not found: {0}")]
    EndpointNotFound(String),

    #[error("invalid endpoint class: '{0}'\n  hint: valid classes are: primary, fallback, federated")]
    InvalidClass(String),

    #[error("invalid endpoint status: '{0}'\n  hint: valid statuses are: online, offline, checking")]
    InvalidStatus(String),

    #[error("invalid endpoint url: '{0}'\n  hint: urls must start with http:// or https://")]
    InvalidUrl(String),

    #[error("queue item not found: {0}")]
    QueueItemNotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for lifeline-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
