// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable list of candidate endpoints.
//!
//! The registry is the only mutable state shared between concurrent probes.
//! Every mutation is a read-modify-write of the stored list performed under
//! an in-process mutex plus the store's lock on the key, so status updates
//! landing in any order, from any process, never lose each other.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::{ClockSource, SystemClock};
use crate::endpoint::{
    validate_url, EndpointPatch, EndpointRecord, EndpointStatus, NewEndpoint,
};
use crate::error::{Error, Result};
use crate::id::generate_unique_endpoint_id;
use crate::store::{read_record, write_record, KvStore, StoreLock, SERVERS_KEY};

/// Id of the built-in endpoint used until the user saves a registry.
pub const DEFAULT_ENDPOINT_ID: &str = "default";

/// Endpoint registry backed by a [`KvStore`].
pub struct EndpointRegistry {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn ClockSource>,
    default_endpoint: NewEndpoint,
    lock: Mutex<()>,
}

impl EndpointRegistry {
    /// Create a registry using the system clock.
    pub fn new(store: Arc<dyn KvStore>, default_endpoint: NewEndpoint) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), default_endpoint)
    }

    /// Create a registry with a custom clock (used for id generation).
    pub fn with_clock(
        store: Arc<dyn KvStore>,
        clock: Arc<dyn ClockSource>,
        default_endpoint: NewEndpoint,
    ) -> Self {
        EndpointRegistry {
            store,
            clock,
            default_endpoint,
            lock: Mutex::new(()),
        }
    }

    /// The record returned when nothing has been persisted yet.
    pub fn default_record(&self) -> EndpointRecord {
        EndpointRecord {
            id: DEFAULT_ENDPOINT_ID.to_string(),
            name: self.default_endpoint.name.clone(),
            url: self.default_endpoint.url.clone(),
            class: self.default_endpoint.class,
            status: EndpointStatus::Checking,
            latency_ms: None,
            priority: self.default_endpoint.priority,
        }
    }

    /// List all endpoints in registration order.
    ///
    /// Never fails: an absent or unreadable registry yields the built-in default.
    pub fn list(&self) -> Vec<EndpointRecord> {
        let _guard = self.guard();
        self.load()
    }

    /// Find an endpoint by id.
    pub fn get(&self, id: &str) -> Option<EndpointRecord> {
        self.list().into_iter().find(|e| e.id == id)
    }

    /// Register a new endpoint. It starts in `checking` until the next probe.
    pub fn add(&self, new: NewEndpoint) -> Result<EndpointRecord> {
        validate_url(&new.url)?;
        if new.name.trim().is_empty() {
            return Err(Error::InvalidInput("endpoint name cannot be empty".to_string()));
        }

        let _held = self.lock_for_update()?;
        let mut endpoints = self.load();

        let id = generate_unique_endpoint_id(&new.name, self.clock.now_ms(), |candidate| {
            endpoints.iter().any(|e| e.id == candidate)
        });
        let record = EndpointRecord {
            id,
            name: new.name,
            url: new.url,
            class: new.class,
            status: EndpointStatus::Checking,
            latency_ms: None,
            priority: new.priority,
        };
        endpoints.push(record.clone());
        self.save(&endpoints)?;

        tracing::info!(endpoint_id = %record.id, url = %record.url, "endpoint added");
        Ok(record)
    }

    /// Remove an endpoint. Returns false if no endpoint had that id.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let _held = self.lock_for_update()?;
        let mut endpoints = self.load();

        let before = endpoints.len();
        endpoints.retain(|e| e.id != id);
        if endpoints.len() == before {
            return Ok(false);
        }
        self.save(&endpoints)?;

        tracing::info!(endpoint_id = %id, "endpoint removed");
        Ok(true)
    }

    /// Apply an explicit user edit. The id never changes; status resets to
    /// `checking` when the url changes.
    pub fn edit(&self, id: &str, patch: EndpointPatch) -> Result<EndpointRecord> {
        if let Some(url) = &patch.url {
            validate_url(url)?;
        }

        let _held = self.lock_for_update()?;
        let mut endpoints = self.load();

        let record = endpoints
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::EndpointNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(url) = patch.url {
            if url != record.url {
                record.url = url;
                record.status = EndpointStatus::Checking;
                record.latency_ms = None;
            }
        }
        if let Some(class) = patch.class {
            record.class = class;
        }
        if let Some(priority) = patch.priority {
            record.priority = priority;
        }

        let updated = record.clone();
        self.save(&endpoints)?;
        Ok(updated)
    }

    /// Record a probe result. Unknown ids are ignored.
    ///
    /// Returns true if a record was updated. Persistence failures are logged,
    /// not returned: a lost status update is corrected by the next probe.
    pub fn update_status(&self, id: &str, status: EndpointStatus, latency_ms: Option<i64>) -> bool {
        let _held = match self.lock_for_update() {
            Ok(held) => held,
            Err(e) => {
                tracing::warn!(endpoint_id = %id, error = %e, "failed to lock registry for status update");
                return false;
            }
        };
        let mut endpoints = self.load();

        let Some(record) = endpoints.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        record.status = status;
        if latency_ms.is_some() {
            record.latency_ms = latency_ms;
        }

        if let Err(e) = self.save(&endpoints) {
            tracing::warn!(endpoint_id = %id, error = %e, "failed to persist endpoint status");
            return false;
        }
        true
    }

    /// Mark every endpoint offline in one update. Returns how many changed.
    pub fn mark_all_offline(&self) -> usize {
        let _held = match self.lock_for_update() {
            Ok(held) => held,
            Err(e) => {
                tracing::warn!(error = %e, "failed to lock registry to mark endpoints offline");
                return 0;
            }
        };
        let mut endpoints = self.load();

        let mut changed = 0;
        for record in endpoints
            .iter_mut()
            .filter(|e| e.status != EndpointStatus::Offline)
        {
            record.status = EndpointStatus::Offline;
            changed += 1;
        }
        if changed == 0 {
            return 0;
        }

        if let Err(e) = self.save(&endpoints) {
            tracing::warn!(error = %e, "failed to persist offline endpoint statuses");
        }
        changed
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded value is unit; a poisoned lock carries no broken state.
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Serialize a read-modify-write against this registry and any other
    /// process sharing the store.
    fn lock_for_update(&self) -> Result<(MutexGuard<'_, ()>, StoreLock)> {
        let guard = self.guard();
        let held = self.store.lock(SERVERS_KEY)?;
        Ok((guard, held))
    }

    fn load(&self) -> Vec<EndpointRecord> {
        read_record(self.store.as_ref(), SERVERS_KEY).unwrap_or_else(|| vec![self.default_record()])
    }

    fn save(&self, endpoints: &[EndpointRecord]) -> Result<()> {
        write_record(self.store.as_ref(), SERVERS_KEY, endpoints)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
