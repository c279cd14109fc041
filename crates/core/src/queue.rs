// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable queue of actions taken while disconnected.
//!
//! Items keep their insertion order. An item leaves the queue only after a
//! confirmed replay; a failed replay leaves it in place with its retry count
//! bumped, ahead of everything queued after it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{ClockSource, SystemClock};
use crate::error::{Error, Result};
use crate::id::generate_queue_id;
use crate::store::{read_record, write_record, KvStore, StoreLock, QUEUE_KEY};

/// One queued action. The payload is opaque to the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSyncItem {
    pub id: String,
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
    #[serde(default)]
    pub retry_count: u32,
}

/// Offline queue persisted under [`QUEUE_KEY`].
pub struct SyncQueue {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn ClockSource>,
    seq: AtomicU64,
    lock: Mutex<()>,
}

impl SyncQueue {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KvStore>, clock: Arc<dyn ClockSource>) -> Self {
        SyncQueue {
            store,
            clock,
            seq: AtomicU64::new(0),
            lock: Mutex::new(()),
        }
    }

    /// Append an action. Only touches local storage.
    pub fn enqueue(&self, payload: serde_json::Value) -> Result<PendingSyncItem> {
        let _held = self.lock_for_update()?;
        let mut items = self.load();

        let now_ms = self.clock.now_ms();
        let mut id = generate_queue_id(now_ms, self.seq.fetch_add(1, Ordering::Relaxed));
        while items.iter().any(|item| item.id == id) {
            id = generate_queue_id(now_ms, self.seq.fetch_add(1, Ordering::Relaxed));
        }

        let item = PendingSyncItem {
            id,
            payload,
            enqueued_at: self.clock.now(),
            retry_count: 0,
        };
        items.push(item.clone());
        self.save(&items)?;

        tracing::debug!(item_id = %item.id, pending = items.len(), "action queued");
        Ok(item)
    }

    /// All queued items in order, without removing them.
    pub fn peek_all(&self) -> Vec<PendingSyncItem> {
        let _guard = self.guard();
        self.load()
    }

    /// The oldest queued item.
    pub fn front(&self) -> Option<PendingSyncItem> {
        self.peek_all().into_iter().next()
    }

    /// Number of queued items. Read-only.
    pub fn pending_count(&self) -> usize {
        self.peek_all().len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.pending_count() == 0
    }

    /// Remove an item after a confirmed replay. Returns false if it was already gone.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let _held = self.lock_for_update()?;
        let mut items = self.load();

        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(&items)?;
        Ok(true)
    }

    /// Bump the retry count of an item in place. Returns the new count.
    pub fn record_failure(&self, id: &str) -> Result<u32> {
        let _held = self.lock_for_update()?;
        let mut items = self.load();

        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| Error::QueueItemNotFound(id.to_string()))?;
        item.retry_count = item.retry_count.saturating_add(1);
        let count = item.retry_count;

        self.save(&items)?;
        Ok(count)
    }

    /// Drop every queued item. Returns how many were dropped.
    pub fn clear(&self) -> Result<usize> {
        let _held = self.lock_for_update()?;
        let dropped = self.load().len();
        self.store.remove(QUEUE_KEY)?;
        Ok(dropped)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_for_update(&self) -> Result<(MutexGuard<'_, ()>, StoreLock)> {
        let guard = self.guard();
        let held = self.store.lock(QUEUE_KEY)?;
        Ok((guard, held))
    }

    fn load(&self) -> Vec<PendingSyncItem> {
        read_record(self.store.as_ref(), QUEUE_KEY).unwrap_or_default()
    }

    fn save(&self, items: &[PendingSyncItem]) -> Result<()> {
        write_record(self.store.as_ref(), QUEUE_KEY, items)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
