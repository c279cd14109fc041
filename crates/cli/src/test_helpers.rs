// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared mocks and builders for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use lifeline_core::{
    EndpointClass, EndpointRecord, EndpointStatus, MemoryStore, NewEndpoint, PendingSyncItem,
};
use tokio::sync::Semaphore;

use crate::notify::{NotificationKind, Notifier};
use crate::probe::{ProbeFuture, ProbeOutcome, Prober};
use crate::sync::{ReplayFuture, ReplayOutcome, Replayer};

/// Url of the built-in default endpoint in tests.
pub const DEFAULT_URL: &str = "http://primary.test";

pub fn default_endpoint() -> NewEndpoint {
    NewEndpoint::new("Primary", DEFAULT_URL)
}

pub fn make_endpoint(id: &str, url: &str, priority: i32) -> EndpointRecord {
    EndpointRecord {
        id: id.to_string(),
        name: id.to_string(),
        url: url.to_string(),
        class: EndpointClass::Primary,
        status: EndpointStatus::Checking,
        latency_ms: None,
        priority,
    }
}

pub fn make_item(id: &str, payload: serde_json::Value) -> PendingSyncItem {
    PendingSyncItem {
        id: id.to_string(),
        payload,
        enqueued_at: Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap(),
        retry_count: 0,
    }
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// How the mock prober answers for one url.
#[derive(Debug, Clone, Copy)]
pub enum ProbeBehavior {
    Respond(ProbeOutcome),
    /// Never completes.
    Hang,
    /// Completes with the outcome once a permit is released via [`MockProber::release`].
    Gated(ProbeOutcome),
}

/// Mock prober for testing without real sockets.
///
/// Urls without a configured behavior are unreachable.
pub struct MockProber {
    behaviors: Mutex<HashMap<String, ProbeBehavior>>,
    calls: AtomicUsize,
    gate: Semaphore,
}

impl MockProber {
    pub fn new() -> Self {
        MockProber {
            behaviors: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        }
    }

    pub fn set(&self, url: &str, behavior: ProbeBehavior) {
        self.behaviors.lock().unwrap().insert(url.to_string(), behavior);
    }

    pub fn online(&self, url: &str, latency_ms: i64) {
        self.set(url, ProbeBehavior::Respond(ProbeOutcome::reachable(latency_ms)));
    }

    pub fn offline(&self, url: &str) {
        self.set(url, ProbeBehavior::Respond(ProbeOutcome::unreachable()));
    }

    /// Let `n` gated probes complete.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Number of probes started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Prober for MockProber {
    fn probe<'a>(&'a self, url: &'a str) -> ProbeFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(ProbeBehavior::Respond(ProbeOutcome::unreachable()));

        Box::pin(async move {
            match behavior {
                ProbeBehavior::Respond(outcome) => outcome,
                ProbeBehavior::Hang => std::future::pending().await,
                ProbeBehavior::Gated(outcome) => {
                    self.gate.acquire().await.unwrap().forget();
                    outcome
                }
            }
        })
    }
}

/// Mock replayer that records delivered payloads and fails on chosen ones.
pub struct MockReplayer {
    failing: Mutex<Vec<serde_json::Value>>,
    delivered: Mutex<Vec<serde_json::Value>>,
    attempts: AtomicUsize,
}

impl MockReplayer {
    pub fn new() -> Self {
        MockReplayer {
            failing: Mutex::new(Vec::new()),
            delivered: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Make replays of this payload fail until [`MockReplayer::heal`] is called.
    pub fn fail_on(&self, payload: serde_json::Value) {
        self.failing.lock().unwrap().push(payload);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn delivered(&self) -> Vec<serde_json::Value> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Replayer for MockReplayer {
    fn replay<'a>(
        &'a self,
        _endpoint: &'a EndpointRecord,
        item: &'a PendingSyncItem,
    ) -> ReplayFuture<'a> {
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.failing.lock().unwrap().contains(&item.payload) {
                return ReplayOutcome::Failed("mock rejection".to_string());
            }
            self.delivered.lock().unwrap().push(item.payload.clone());
            ReplayOutcome::Delivered
        })
    }
}

/// Notifier that keeps everything it is told.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(NotificationKind, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.events.lock().unwrap().iter().map(|(k, _)| *k).collect()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.kinds().into_iter().filter(|k| *k == kind).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, detail: &str) {
        self.events.lock().unwrap().push((kind, detail.to_string()));
    }
}
