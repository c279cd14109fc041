// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity state shared between the monitor and its readers.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Connectivity state values for the atomic state field.
pub const STATE_OFFLINE: u8 = 0;
pub const STATE_REFRESHING: u8 = 1;
pub const STATE_ONLINE: u8 = 2;

/// Connectivity state visible to the event loop, spawned refreshes and status
/// readers.
///
/// Uses atomic fields for lock-free reads.
pub struct SharedConnectivity {
    /// Last published state.
    state: AtomicU8,
    /// Raw transport signal, before the emergency override.
    transport_online: AtomicBool,
    /// Single-flight flag for refresh passes.
    refreshing: AtomicBool,
    /// Completed selection passes (for status reporting).
    passes: AtomicU32,
}

impl SharedConnectivity {
    /// Create a new shared state: offline, transport assumed up.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(STATE_OFFLINE),
            transport_online: AtomicBool::new(true),
            refreshing: AtomicBool::new(false),
            passes: AtomicU32::new(0),
        }
    }

    pub fn get(&self) -> u8 {
        self.state.load(Ordering::Acquire)
    }

    pub fn set(&self, state: u8) {
        self.state.store(state, Ordering::Release);
    }

    pub fn is_online(&self) -> bool {
        self.get() == STATE_ONLINE
    }

    pub fn transport_online(&self) -> bool {
        self.transport_online.load(Ordering::Acquire)
    }

    /// Record a transport signal. Returns the previous value.
    pub fn set_transport_online(&self, online: bool) -> bool {
        self.transport_online.swap(online, Ordering::AcqRel)
    }

    pub fn passes(&self) -> u32 {
        self.passes.load(Ordering::Acquire)
    }

    /// Claim the refresh slot, or `None` if a pass is already in flight.
    ///
    /// The slot is released when the returned guard drops, including when the
    /// refreshing future is dropped mid-pass.
    pub fn try_begin_refresh(&self) -> Option<RefreshGuard<'_>> {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard { shared: self })
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Get a human-readable status string.
    pub fn status_string(&self) -> String {
        let base = match self.get() {
            STATE_OFFLINE if !self.transport_online() => "offline (no transport)",
            STATE_OFFLINE => "offline",
            STATE_REFRESHING => "refreshing",
            STATE_ONLINE => "online",
            _ => "unknown",
        };
        if self.is_refreshing() && self.get() != STATE_REFRESHING {
            format!("{} (refreshing)", base)
        } else {
            base.to_string()
        }
    }
}

impl Default for SharedConnectivity {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the refresh slot of a [`SharedConnectivity`].
pub struct RefreshGuard<'a> {
    shared: &'a SharedConnectivity,
}

impl RefreshGuard<'_> {
    /// Count this pass as completed.
    pub fn complete(self) {
        self.shared.passes.fetch_add(1, Ordering::AcqRel);
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.shared.refreshing.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
