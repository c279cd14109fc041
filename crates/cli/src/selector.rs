// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Best-endpoint selection.
//!
//! Every registered endpoint is probed at once; selection waits for all
//! probes (each capped by the probe timeout) before ranking, so a pass takes
//! as long as the slowest probe rather than the sum of them.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use lifeline_core::{EndpointRecord, EndpointRegistry, EndpointStatus};

use crate::probe::{ProbeOutcome, Prober};

/// Probes the registry and picks the endpoint to use.
pub struct EndpointSelector {
    registry: Arc<EndpointRegistry>,
    prober: Arc<dyn Prober>,
    probe_timeout: Duration,
}

impl EndpointSelector {
    pub fn new(
        registry: Arc<EndpointRegistry>,
        prober: Arc<dyn Prober>,
        probe_timeout: Duration,
    ) -> Self {
        EndpointSelector {
            registry,
            prober,
            probe_timeout,
        }
    }

    /// Probe all endpoints, record their status, and return the best online one.
    ///
    /// Returns `None` when nothing is reachable, which is a normal state.
    pub async fn select_best(&self) -> Option<EndpointRecord> {
        let endpoints = self.registry.list();
        if endpoints.is_empty() {
            tracing::info!("no endpoints registered");
            return None;
        }

        let probed = join_all(endpoints.into_iter().map(|e| self.probe_and_record(e))).await;

        let online = probed.iter().filter(|e| e.is_online()).count();
        let best = rank(&probed);
        tracing::debug!(
            probed = probed.len(),
            online,
            best = best.as_ref().map(|e| e.id.as_str()).unwrap_or("none"),
            "endpoint selection completed"
        );
        best
    }

    async fn probe_and_record(&self, mut endpoint: EndpointRecord) -> EndpointRecord {
        let outcome = tokio::time::timeout(self.probe_timeout, self.prober.probe(&endpoint.url))
            .await
            .unwrap_or_else(|_| ProbeOutcome::unreachable());

        endpoint.status = if outcome.online {
            EndpointStatus::Online
        } else {
            EndpointStatus::Offline
        };
        endpoint.latency_ms = Some(outcome.latency_ms);
        self.registry
            .update_status(&endpoint.id, endpoint.status, endpoint.latency_ms);

        tracing::debug!(
            endpoint_id = %endpoint.id,
            online = outcome.online,
            latency_ms = outcome.latency_ms,
            "endpoint probed"
        );
        endpoint
    }
}

/// Pick the online endpoint with the lowest priority, then the lowest latency.
///
/// Endpoints tied on both keep registry order, so the result depends only on
/// the probe outcomes.
pub fn rank(endpoints: &[EndpointRecord]) -> Option<EndpointRecord> {
    let mut online: Vec<&EndpointRecord> = endpoints.iter().filter(|e| e.is_online()).collect();
    online.sort_by_key(|e| (e.priority, e.ranking_latency()));
    online.first().map(|e| (*e).clone())
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
