// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay of queued actions against an endpoint.
//!
//! Provides a trait-based replayer that enables:
//! - Real HTTP delivery for production
//! - Mock replayers for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use lifeline_core::{EndpointRecord, PendingSyncItem};

use crate::error::{Error, Result};
use crate::probe::join_url;

/// Default path queued actions are posted to.
pub const DEFAULT_REPLAY_PATH: &str = "/sync";

/// Default limit on a single replay.
pub const REPLAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of replaying one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// The endpoint confirmed the action.
    Delivered,
    /// The action was not confirmed. The reason is for diagnostics only.
    Failed(String),
}

impl ReplayOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, ReplayOutcome::Delivered)
    }
}

/// Boxed future returned by [`Replayer::replay`].
pub type ReplayFuture<'a> = Pin<Box<dyn Future<Output = ReplayOutcome> + Send + 'a>>;

/// Something that can deliver a queued action to an endpoint.
pub trait Replayer: Send + Sync {
    /// Deliver `item` to `endpoint`. Never fails; a failure is a value.
    fn replay<'a>(&'a self, endpoint: &'a EndpointRecord, item: &'a PendingSyncItem)
        -> ReplayFuture<'a>;
}

/// Replayer posting the item as JSON to `<url><replay_path>`. Any 2xx confirms it.
#[derive(Debug, Clone)]
pub struct HttpReplayer {
    client: reqwest::Client,
    replay_path: String,
}

impl HttpReplayer {
    pub fn new(replay_path: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(HttpReplayer {
            client,
            replay_path: replay_path.to_string(),
        })
    }
}

impl Replayer for HttpReplayer {
    fn replay<'a>(
        &'a self,
        endpoint: &'a EndpointRecord,
        item: &'a PendingSyncItem,
    ) -> ReplayFuture<'a> {
        Box::pin(async move {
            let target = join_url(&endpoint.url, &self.replay_path);

            match self.client.post(&target).json(item).send().await {
                Ok(response) if response.status().is_success() => ReplayOutcome::Delivered,
                Ok(response) => ReplayOutcome::Failed(format!("HTTP {}", response.status())),
                Err(e) => ReplayOutcome::Failed(e.to_string()),
            }
        })
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
