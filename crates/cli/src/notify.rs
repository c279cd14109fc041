// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-and-forget status notifications.
//!
//! The resilience layer never waits on a notifier and never learns whether
//! a notification was shown.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Effective state became online.
    WentOnline,
    /// Effective state became offline.
    WentOffline,
    /// The emergency override was changed.
    EmergencyChanged,
    /// A drain pass halted on a failing item.
    SyncFailed,
    /// A drain pass emptied the queue.
    SyncCompleted,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::WentOnline => "went_online",
            NotificationKind::WentOffline => "went_offline",
            NotificationKind::EmergencyChanged => "emergency_changed",
            NotificationKind::SyncFailed => "sync_failed",
            NotificationKind::SyncCompleted => "sync_completed",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Receiver of status notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification. Must not block.
    fn notify(&self, kind: NotificationKind, detail: &str);
}

/// Notifier that writes to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotificationKind, detail: &str) {
        match kind {
            NotificationKind::SyncFailed | NotificationKind::WentOffline => {
                tracing::warn!(kind = %kind, "{}", detail)
            }
            _ => tracing::info!(kind = %kind, "{}", detail),
        }
    }
}

/// A notification as delivered through [`ChannelNotifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub detail: String,
}

/// Notifier that forwards into an unbounded channel.
///
/// Sending never blocks; notifications are dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelNotifier { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, kind: NotificationKind, detail: &str) {
        let _ = self.tx.send(Notification {
            kind,
            detail: detail.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
