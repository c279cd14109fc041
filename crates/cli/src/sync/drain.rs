// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Draining the offline queue against the active endpoint.
//!
//! Items are replayed strictly in queue order. The first failure halts the
//! pass: that item and everything behind it stay queued, untouched and in
//! order, for the next pass.
//!
//! A failure seen after the endpoint stopped being active is a lost
//! connection, not a rejection: it halts the pass without counting against
//! the item.

use std::sync::Arc;
use std::time::Duration;

use lifeline_core::{EndpointRecord, SyncQueue};
use serde::Serialize;

use super::replay::{ReplayOutcome, Replayer};
use crate::error::Result;

/// Where a drain pass stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrainHalt {
    /// The item whose replay failed. It is now the front of the queue.
    pub item_id: String,
    pub reason: String,
    /// Failed replays of this item so far, including this one.
    pub retry_count: u32,
    /// The endpoint went away during the replay; the failure was not counted.
    pub connection_lost: bool,
}

/// Summary of one drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Items confirmed and removed during this pass.
    pub replayed: usize,
    /// Items still queued after the pass.
    pub remaining: usize,
    pub halted: Option<DrainHalt>,
}

impl DrainReport {
    /// True if the pass emptied the queue.
    pub fn is_complete(&self) -> bool {
        self.halted.is_none() && self.remaining == 0
    }
}

/// Replays queued items through a [`Replayer`].
pub struct Drainer {
    queue: Arc<SyncQueue>,
    replayer: Arc<dyn Replayer>,
    replay_timeout: Duration,
}

impl Drainer {
    pub fn new(queue: Arc<SyncQueue>, replayer: Arc<dyn Replayer>, replay_timeout: Duration) -> Self {
        Drainer {
            queue,
            replayer,
            replay_timeout,
        }
    }

    /// Run one pass against `endpoint`.
    ///
    /// Only storage errors are returned; replay failures end up in the report.
    pub async fn drain(&self, endpoint: &EndpointRecord) -> Result<DrainReport> {
        self.drain_while(endpoint, || true).await
    }

    /// Run one pass, consulting `still_active` after a failed replay.
    ///
    /// When it returns false the failed item keeps its retry count and the
    /// halt is marked `connection_lost`.
    pub async fn drain_while<F>(&self, endpoint: &EndpointRecord, still_active: F) -> Result<DrainReport>
    where
        F: Fn() -> bool,
    {
        let mut report = DrainReport::default();

        while let Some(item) = self.queue.front() {
            let outcome = tokio::time::timeout(
                self.replay_timeout,
                self.replayer.replay(endpoint, &item),
            )
            .await
            .unwrap_or_else(|_| ReplayOutcome::Failed("replay timed out".to_string()));

            match outcome {
                ReplayOutcome::Delivered => {
                    self.queue.remove(&item.id)?;
                    report.replayed += 1;
                    tracing::debug!(item_id = %item.id, endpoint_id = %endpoint.id, "queued action replayed");
                }
                ReplayOutcome::Failed(reason) if !still_active() => {
                    tracing::debug!(
                        item_id = %item.id,
                        endpoint_id = %endpoint.id,
                        reason = %reason,
                        "endpoint lost during replay, halting drain"
                    );
                    report.halted = Some(DrainHalt {
                        item_id: item.id,
                        reason,
                        retry_count: item.retry_count,
                        connection_lost: true,
                    });
                    break;
                }
                ReplayOutcome::Failed(reason) => {
                    let retry_count = self.queue.record_failure(&item.id)?;
                    tracing::warn!(
                        item_id = %item.id,
                        endpoint_id = %endpoint.id,
                        retry_count,
                        reason = %reason,
                        "replay failed, halting drain"
                    );
                    report.halted = Some(DrainHalt {
                        item_id: item.id,
                        reason,
                        retry_count,
                        connection_lost: false,
                    });
                    break;
                }
            }
        }

        report.remaining = self.queue.pending_count();
        Ok(report)
    }
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
