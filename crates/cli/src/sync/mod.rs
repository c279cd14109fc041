// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline sync: replaying locally queued actions once connectivity returns.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Drainer   │────►│  Replayer   │────►│   Active    │
//! │             │◄────│   (trait)   │◄────│  Endpoint   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  SyncQueue  │  (lifeline-core, persisted)
//! └─────────────┘
//! ```

mod drain;
mod replay;

pub use drain::{DrainHalt, DrainReport, Drainer};
pub use replay::{
    HttpReplayer, ReplayFuture, ReplayOutcome, Replayer, DEFAULT_REPLAY_PATH, REPLAY_TIMEOUT,
};
