// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The resilience manager: one explicitly constructed owner of the registry,
//! emergency override, sync queue and connectivity monitor.
//!
//! Built once per process from injected collaborators and shared by
//! reference (`Arc`) with every consumer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use lifeline_core::id::generate_queue_id;
use lifeline_core::{
    ClockSource, EmergencyConfig, EmergencyController, EndpointRecord, EndpointRegistry, KvStore, NewEndpoint,
    PendingSyncItem, SyncQueue, SystemClock,
};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::monitor::{ConnectivityMonitor, ConnectivityState, MonitorConfig, RefreshOutcome, Trigger};
use crate::notify::{NotificationKind, Notifier};
use crate::probe::Prober;
use crate::sync::{DrainReport, Drainer, ReplayOutcome, Replayer, REPLAY_TIMEOUT};

/// Construction parameters for [`ResilienceManager`].
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub monitor: MonitorConfig,
    pub replay_timeout: Duration,
    /// Endpoint reported by the registry until the user persists their own.
    pub default_endpoint: NewEndpoint,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            replay_timeout: REPLAY_TIMEOUT,
            default_endpoint: NewEndpoint::new("Primary", crate::config::DEFAULT_ENDPOINT_URL),
        }
    }
}

/// Result of [`ResilienceManager::submit`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Replayed against the active endpoint right away.
    Delivered { endpoint_id: String },
    /// Buffered for a later drain.
    Queued { item: PendingSyncItem },
}

/// Point-in-time view of the resilience layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    pub state: ConnectivityState,
    /// Human-readable state, e.g. `offline (no transport)`.
    pub detail: String,
    pub transport_online: bool,
    pub active_endpoint: Option<EndpointRecord>,
    pub pending: usize,
    pub emergency: EmergencyConfig,
    pub last_refresh: Option<DateTime<Utc>>,
}

pub struct ResilienceManager {
    registry: Arc<EndpointRegistry>,
    emergency: Arc<EmergencyController>,
    queue: Arc<SyncQueue>,
    monitor: ConnectivityMonitor,
    drainer: Drainer,
    replayer: Arc<dyn Replayer>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn ClockSource>,
    config: ManagerConfig,
    /// No automatic drain before this instant (set after a halted pass).
    drain_retry_after: Mutex<Option<Instant>>,
    /// Serializes drain passes and immediate submits so replays stay in order.
    replay_lock: tokio::sync::Mutex<()>,
}

impl ResilienceManager {
    pub fn new(
        store: Arc<dyn KvStore>,
        prober: Arc<dyn Prober>,
        replayer: Arc<dyn Replayer>,
        notifier: Arc<dyn Notifier>,
        config: ManagerConfig,
    ) -> Self {
        Self::with_clock(store, prober, replayer, notifier, Arc::new(SystemClock), config)
    }

    /// Build a manager whose ids and timestamps come from `clock`.
    pub fn with_clock(
        store: Arc<dyn KvStore>,
        prober: Arc<dyn Prober>,
        replayer: Arc<dyn Replayer>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn ClockSource>,
        config: ManagerConfig,
    ) -> Self {
        let registry = Arc::new(EndpointRegistry::with_clock(
            store.clone(),
            clock.clone(),
            config.default_endpoint.clone(),
        ));
        let emergency = Arc::new(EmergencyController::new(store.clone()));
        let queue = Arc::new(SyncQueue::with_clock(store, clock.clone()));
        let monitor = ConnectivityMonitor::with_clock(
            registry.clone(),
            emergency.clone(),
            prober,
            notifier.clone(),
            clock.clone(),
            config.monitor,
        );
        let drainer = Drainer::new(queue.clone(), replayer.clone(), config.replay_timeout);

        ResilienceManager {
            registry,
            emergency,
            queue,
            monitor,
            drainer,
            replayer,
            notifier,
            clock,
            config,
            drain_retry_after: Mutex::new(None),
            replay_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn queue(&self) -> &SyncQueue {
        &self.queue
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn emergency(&self) -> EmergencyConfig {
        self.emergency.get()
    }

    /// Persist a new emergency override and apply it immediately.
    pub fn set_emergency(&self, config: EmergencyConfig) -> Result<()> {
        let previous = self.emergency.get();
        self.emergency.set(&config)?;
        if previous != config {
            self.notifier.notify(
                NotificationKind::EmergencyChanged,
                &format!(
                    "enabled={} offline={} low_bandwidth={} p2p={}",
                    config.enabled,
                    config.offline_mode,
                    config.low_bandwidth_mode,
                    config.p2p_enabled
                ),
            );
        }
        self.monitor.publish();
        Ok(())
    }

    /// Dispatch one trigger, then drain if the pass left us online.
    pub async fn handle(&self, trigger: Trigger) -> RefreshOutcome {
        let outcome = self.monitor.handle(trigger).await;
        if matches!(outcome, RefreshOutcome::Completed { online: true, .. }) {
            self.drain_if_due().await;
        }
        outcome
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.handle(Trigger::Manual).await
    }

    /// Replay the queue against the active endpoint now, ignoring the retry
    /// backoff.
    ///
    /// Errors with [`Error::NoActiveEndpoint`] while effectively offline.
    /// `SyncFailed` is only reported while the endpoint is still active; a
    /// failure caused by the connection dropping mid-pass waits silently for
    /// the next online transition.
    pub async fn drain(&self) -> Result<DrainReport> {
        let endpoint = self.monitor.active_endpoint().ok_or(Error::NoActiveEndpoint)?;
        let _replaying = self.replay_lock.lock().await;

        let report = self
            .drainer
            .drain_while(&endpoint, || self.is_still_active(&endpoint))
            .await?;
        match &report.halted {
            Some(halt) if halt.connection_lost => {
                self.set_retry_after(None);
                tracing::debug!(
                    item_id = %halt.item_id,
                    endpoint_id = %endpoint.id,
                    remaining = report.remaining,
                    "drain interrupted by lost connection"
                );
            }
            Some(halt) => {
                self.set_retry_after(Some(Instant::now() + self.config.monitor.refresh_interval));
                self.notifier.notify(
                    NotificationKind::SyncFailed,
                    &format!(
                        "{} failed against {}: {} ({} still queued)",
                        halt.item_id, endpoint.id, halt.reason, report.remaining
                    ),
                );
            }
            None => {
                self.set_retry_after(None);
                if report.replayed > 0 {
                    tracing::info!(
                        replayed = report.replayed,
                        endpoint_id = %endpoint.id,
                        "sync queue drained"
                    );
                    self.notifier.notify(
                        NotificationKind::SyncCompleted,
                        &format!("{} replayed to {}", report.replayed, endpoint.id),
                    );
                }
            }
        }
        Ok(report)
    }

    /// Drain unless offline, empty, or still backing off from a failure.
    pub async fn drain_if_due(&self) -> Option<DrainReport> {
        if !self.monitor.is_online() || self.queue.is_empty() {
            return None;
        }
        if let Some(after) = self.retry_after() {
            if Instant::now() < after {
                tracing::debug!(pending = self.queue.pending_count(), "drain backing off");
                return None;
            }
        }
        match self.drain().await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(error = %e, "drain failed");
                None
            }
        }
    }

    /// Deliver `payload` now if possible, otherwise queue it.
    ///
    /// Never fails on network errors; only storage errors are returned.
    pub async fn submit(&self, payload: serde_json::Value) -> Result<SubmitOutcome> {
        if let Some(endpoint) = self.monitor.active_endpoint() {
            let _replaying = self.replay_lock.lock().await;
            // Earlier actions must reach the server first.
            if self.queue.is_empty() {
                let item = PendingSyncItem {
                    id: generate_queue_id(self.clock.now_ms(), 0),
                    payload: payload.clone(),
                    enqueued_at: self.clock.now(),
                    retry_count: 0,
                };
                let outcome = tokio::time::timeout(
                    self.config.replay_timeout,
                    self.replayer.replay(&endpoint, &item),
                )
                .await
                .unwrap_or_else(|_| ReplayOutcome::Failed("replay timed out".to_string()));
                match outcome {
                    ReplayOutcome::Delivered => {
                        return Ok(SubmitOutcome::Delivered {
                            endpoint_id: endpoint.id,
                        });
                    }
                    ReplayOutcome::Failed(reason) => {
                        tracing::debug!(endpoint_id = %endpoint.id, reason = %reason, "direct delivery failed, queueing");
                    }
                }
            }
        }

        let item = self.queue.enqueue(payload)?;
        Ok(SubmitOutcome::Queued { item })
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            state: self.monitor.state(),
            detail: self.monitor.shared().status_string(),
            transport_online: self.monitor.transport_online(),
            active_endpoint: self.monitor.active_endpoint(),
            pending: self.queue.pending_count(),
            emergency: self.emergency.get(),
            last_refresh: self.monitor.last_refresh(),
        }
    }

    /// Drive the monitor until `cancel` fires.
    ///
    /// The first timer tick fires immediately, so a pass starts on entry.
    /// Offline signals are applied inline; everything else runs on a spawned
    /// task and coalesces with any pass already in flight.
    pub async fn run(self: Arc<Self>, mut triggers: mpsc::Receiver<Trigger>, cancel: CancellationToken) {
        let mut timer = tokio::time::interval(self.config.monitor.refresh_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("monitor loop cancelled");
                    break;
                }
                _ = timer.tick() => self.spawn_handle(Trigger::Timer),
                Some(trigger) = triggers.recv() => match trigger {
                    Trigger::TransportOffline => self.monitor.go_offline(),
                    Trigger::TransportOnline => {
                        self.monitor.shared().set_transport_online(true);
                        self.spawn_handle(Trigger::TransportOnline);
                    }
                    other => self.spawn_handle(other),
                },
            }
        }
    }

    fn spawn_handle(self: &Arc<Self>, trigger: Trigger) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = this.handle(trigger).await;
            tracing::debug!(?trigger, ?outcome, "trigger handled");
        });
    }

    fn is_still_active(&self, endpoint: &EndpointRecord) -> bool {
        self.monitor
            .active_endpoint()
            .is_some_and(|active| active.id == endpoint.id)
    }

    fn retry_after(&self) -> Option<Instant> {
        self.drain_retry_after.lock().ok().and_then(|after| *after)
    }

    fn set_retry_after(&self, after: Option<Instant>) {
        if let Ok(mut slot) = self.drain_retry_after.lock() {
            *slot = after;
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
