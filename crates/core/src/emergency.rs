// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Emergency mode: a persisted override that forces offline behaviour.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{read_record, write_record, KvStore, EMERGENCY_KEY};

/// Operator/user override flags. Absent storage means everything is off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyConfig {
    /// Operator-wide emergency flag.
    pub enabled: bool,
    /// Treat all traffic as absent regardless of probe results.
    pub offline_mode: bool,
    /// Advisory flag for consumers that can degrade bandwidth usage.
    pub low_bandwidth_mode: bool,
    /// Advisory flag; no peer-to-peer transport exists here.
    pub p2p_enabled: bool,
}

impl EmergencyConfig {
    /// Whether the system must be treated as offline given raw transport state.
    pub fn is_offline(&self, transport_online: bool) -> bool {
        !transport_online || self.offline_mode
    }
}

/// Reads and writes the persisted [`EmergencyConfig`].
pub struct EmergencyController {
    store: Arc<dyn KvStore>,
}

impl EmergencyController {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        EmergencyController { store }
    }

    /// Current configuration. Missing or malformed storage yields the all-off default.
    pub fn get(&self) -> EmergencyConfig {
        read_record(self.store.as_ref(), EMERGENCY_KEY).unwrap_or_default()
    }

    /// Replace the stored configuration.
    pub fn set(&self, config: &EmergencyConfig) -> Result<()> {
        write_record(self.store.as_ref(), EMERGENCY_KEY, config)?;
        tracing::info!(
            enabled = config.enabled,
            offline_mode = config.offline_mode,
            low_bandwidth_mode = config.low_bandwidth_mode,
            p2p_enabled = config.p2p_enabled,
            "emergency config updated"
        );
        Ok(())
    }

    /// The single authority for "is the system unreachable".
    pub fn is_offline(&self, transport_online: bool) -> bool {
        self.get().is_offline(transport_online)
    }
}

#[cfg(test)]
#[path = "emergency_tests.rs"]
mod tests;
