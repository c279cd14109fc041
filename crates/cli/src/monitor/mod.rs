// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitor.
//!
//! Folds endpoint selection and the emergency override into one effective
//! online signal plus the active endpoint:
//!
//! ```text
//!   Trigger::Timer ──────┐
//!   Trigger::Manual ─────┼──► refresh() ──► EndpointSelector ──► active
//!   Trigger::TransportOnline ┘   (single-flight)
//!   Trigger::TransportOffline ──► go_offline() (synchronous, no probe)
//!
//!   effective online = active.is_some() && !emergency.is_offline(transport)
//! ```

mod state;

pub use state::{SharedConnectivity, STATE_OFFLINE, STATE_ONLINE, STATE_REFRESHING};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use lifeline_core::{ClockSource, EmergencyController, EndpointRecord, EndpointRegistry, SystemClock};
use serde::Serialize;

use crate::notify::{NotificationKind, Notifier};
use crate::probe::{Prober, PROBE_TIMEOUT};
use crate::selector::EndpointSelector;

/// Default period of the refresh timer.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Timing policy for the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Upper bound on one probe; a slower endpoint counts as offline.
    pub probe_timeout: Duration,
    /// Period of the refresh timer. Also the minimum gap between drain retries.
    pub refresh_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: PROBE_TIMEOUT,
            refresh_interval: REFRESH_INTERVAL,
        }
    }
}

/// Events that cause the monitor to re-evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Timer,
    TransportOnline,
    TransportOffline,
    Manual,
}

/// Effective connectivity as reported to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    Online,
    Offline,
}

impl ConnectivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectivityState::Online => "online",
            ConnectivityState::Offline => "offline",
        }
    }
}

impl std::fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a refresh request did.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// A selection pass ran to completion.
    Completed {
        /// Effective online state after the pass.
        online: bool,
        /// Best reachable endpoint, regardless of the emergency override.
        active: Option<EndpointRecord>,
    },
    /// Another pass was already in flight; this request was folded into it.
    Coalesced,
    /// The transport is down, so nothing was probed (or the result was
    /// discarded because the transport dropped mid-pass).
    SkippedTransportOffline,
}

/// Tracks which endpoint is usable and whether the system is effectively online.
pub struct ConnectivityMonitor {
    registry: Arc<EndpointRegistry>,
    emergency: Arc<EmergencyController>,
    selector: EndpointSelector,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn ClockSource>,
    shared: SharedConnectivity,
    active: Mutex<Option<EndpointRecord>>,
    last_refresh: Mutex<Option<DateTime<Utc>>>,
    reported: Mutex<ConnectivityState>,
    config: MonitorConfig,
}

impl ConnectivityMonitor {
    pub fn new(
        registry: Arc<EndpointRegistry>,
        emergency: Arc<EmergencyController>,
        prober: Arc<dyn Prober>,
        notifier: Arc<dyn Notifier>,
        config: MonitorConfig,
    ) -> Self {
        Self::with_clock(registry, emergency, prober, notifier, Arc::new(SystemClock), config)
    }

    /// Create a monitor that stamps refreshes with `clock`.
    pub fn with_clock(
        registry: Arc<EndpointRegistry>,
        emergency: Arc<EmergencyController>,
        prober: Arc<dyn Prober>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn ClockSource>,
        config: MonitorConfig,
    ) -> Self {
        let selector = EndpointSelector::new(registry.clone(), prober, config.probe_timeout);
        ConnectivityMonitor {
            registry,
            emergency,
            selector,
            notifier,
            clock,
            shared: SharedConnectivity::new(),
            active: Mutex::new(None),
            last_refresh: Mutex::new(None),
            reported: Mutex::new(ConnectivityState::Offline),
            config,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn shared(&self) -> &SharedConnectivity {
        &self.shared
    }

    /// Dispatch one trigger.
    ///
    /// A transport offline signal never probes; it reports `Completed` with
    /// the forced offline state.
    pub async fn handle(&self, trigger: Trigger) -> RefreshOutcome {
        match trigger {
            Trigger::TransportOffline => {
                self.go_offline();
                RefreshOutcome::Completed {
                    online: false,
                    active: None,
                }
            }
            Trigger::TransportOnline => {
                self.shared.set_transport_online(true);
                self.refresh().await
            }
            Trigger::Timer | Trigger::Manual => self.refresh().await,
        }
    }

    /// Handle a transport offline signal.
    ///
    /// Runs to completion without awaiting: every endpoint is marked offline
    /// and the active endpoint is dropped before this returns.
    pub fn go_offline(&self) {
        let was_up = self.shared.set_transport_online(false);
        let marked = self.registry.mark_all_offline();
        self.set_active(None);
        if was_up {
            tracing::info!(endpoints = marked, "transport went offline");
        }
        self.publish();
    }

    /// Run one selection pass unless one is already in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        if !self.shared.transport_online() {
            return RefreshOutcome::SkippedTransportOffline;
        }
        let Some(guard) = self.shared.try_begin_refresh() else {
            tracing::debug!("refresh already in flight, coalescing");
            return RefreshOutcome::Coalesced;
        };
        if !self.shared.is_online() {
            self.shared.set(STATE_REFRESHING);
        }

        let best = self.selector.select_best().await;

        if !self.shared.transport_online() {
            // Probes that resolved after the offline signal rewrote statuses.
            self.registry.mark_all_offline();
            guard.complete();
            self.publish();
            return RefreshOutcome::SkippedTransportOffline;
        }

        self.set_active(best.clone());
        if let Ok(mut last) = self.last_refresh.lock() {
            *last = Some(self.clock.now());
        }
        guard.complete();
        let online = self.publish();
        RefreshOutcome::Completed {
            online,
            active: best,
        }
    }

    /// Effective online state: a reachable endpoint, the transport up, and
    /// no offline override.
    pub fn is_online(&self) -> bool {
        self.current_active().is_some()
            && !self.emergency.is_offline(self.shared.transport_online())
    }

    pub fn state(&self) -> ConnectivityState {
        if self.is_online() {
            ConnectivityState::Online
        } else {
            ConnectivityState::Offline
        }
    }

    /// The endpoint traffic should go to, or `None` while effectively offline.
    pub fn active_endpoint(&self) -> Option<EndpointRecord> {
        if self.is_online() {
            self.current_active()
        } else {
            None
        }
    }

    pub fn transport_online(&self) -> bool {
        self.shared.transport_online()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh.lock().ok().and_then(|last| *last)
    }

    /// Recompute the effective state and notify on a transition.
    ///
    /// Called after every pass and whenever the emergency override changes.
    /// Returns the effective online state.
    pub fn publish(&self) -> bool {
        let state = self.state();
        self.shared.set(match state {
            ConnectivityState::Online => STATE_ONLINE,
            ConnectivityState::Offline => STATE_OFFLINE,
        });

        let previous = match self.reported.lock() {
            Ok(mut reported) => std::mem::replace(&mut *reported, state),
            Err(_) => state,
        };
        if previous != state {
            let detail = match (state, self.current_active()) {
                (ConnectivityState::Online, Some(endpoint)) => {
                    format!("{} ({})", endpoint.name, endpoint.url)
                }
                _ => self.offline_reason().to_string(),
            };
            tracing::info!(state = %state, detail = %detail, "connectivity changed");
            let kind = match state {
                ConnectivityState::Online => NotificationKind::WentOnline,
                ConnectivityState::Offline => NotificationKind::WentOffline,
            };
            self.notifier.notify(kind, &detail);
        }
        state == ConnectivityState::Online
    }

    fn offline_reason(&self) -> &'static str {
        if !self.shared.transport_online() {
            "transport offline"
        } else if self.emergency.get().offline_mode {
            "offline mode enabled"
        } else {
            "no endpoint reachable"
        }
    }

    fn current_active(&self) -> Option<EndpointRecord> {
        self.active.lock().ok().and_then(|active| active.clone())
    }

    fn set_active(&self, endpoint: Option<EndpointRecord>) {
        if let Ok(mut active) = self.active.lock() {
            *active = endpoint;
        }
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
