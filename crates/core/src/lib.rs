// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! lifeline-core: Shared library for the lifeline endpoint resilience layer
//!
//! This crate provides the persisted state of the resilience layer: the
//! endpoint registry, the emergency override, and the offline sync queue,
//! all stored through an injectable [`KvStore`].

pub mod clock;
pub mod emergency;
pub mod endpoint;
pub mod error;
pub mod id;
pub mod queue;
pub mod registry;
pub mod store;

pub use clock::{ClockSource, SystemClock};
pub use emergency::{EmergencyConfig, EmergencyController};
pub use endpoint::{
    EndpointClass, EndpointPatch, EndpointRecord, EndpointStatus, NewEndpoint, LATENCY_FAILED,
};
pub use error::{Error, Result};
pub use queue::{PendingSyncItem, SyncQueue};
pub use registry::{EndpointRegistry, DEFAULT_ENDPOINT_ID};
pub use store::{FileStore, KvStore, MemoryStore, StoreLock};
