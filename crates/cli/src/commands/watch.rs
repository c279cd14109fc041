// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground connectivity monitor.
//!
//! Runs the monitor loop, feeds transport signals read from stdin into it,
//! and prints every notification until Ctrl-C.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::Context;
use crate::error::{Error, Result};
use crate::monitor::Trigger;
use crate::notify::{ChannelNotifier, Notification};

const LOCK_FILE_NAME: &str = "monitor.lock";

pub async fn run(state_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(state_dir)?;
    let _lock = acquire_lock(&state_dir.join(LOCK_FILE_NAME))?;

    let (notifier, mut notifications) = ChannelNotifier::new();
    let ctx = Context::open_with_notifier(state_dir, Arc::new(notifier))?;
    let (trigger_tx, trigger_rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();

    let monitor = tokio::spawn(ctx.manager.clone().run(trigger_rx, cancel.clone()));
    let reader = tokio::spawn(read_signals(trigger_tx, cancel.clone()));

    println!(
        "Watching {} endpoint(s), refresh every {}s. Ctrl-C to stop.",
        ctx.manager.registry().list().len(),
        ctx.config.refresh_interval_secs
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping monitor");
                break;
            }
            Some(notification) = notifications.recv() => print_notification(&notification),
        }
    }

    cancel.cancel();
    let _ = monitor.await;
    reader.abort();
    Ok(())
}

/// Map one stdin line to a trigger. Blank lines are ignored.
pub(crate) fn parse_signal(line: &str) -> Option<std::result::Result<Trigger, String>> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => None,
        "online" | "up" => Some(Ok(Trigger::TransportOnline)),
        "offline" | "down" => Some(Ok(Trigger::TransportOffline)),
        "refresh" => Some(Ok(Trigger::Manual)),
        other => Some(Err(other.to_string())),
    }
}

async fn read_signals(tx: mpsc::Sender<Trigger>, cancel: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line,
        };
        match line {
            Ok(Some(line)) => match parse_signal(&line) {
                Some(Ok(trigger)) => {
                    if tx.send(trigger).await.is_err() {
                        break;
                    }
                }
                Some(Err(unknown)) => {
                    eprintln!("warning: unknown signal '{}' (expected online, offline or refresh)", unknown);
                }
                None => {}
            },
            Ok(None) => {
                tracing::debug!("stdin closed, timer-driven refresh continues");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stdin");
                break;
            }
        }
    }
}

fn print_notification(notification: &Notification) {
    println!(
        "[{}] {}: {}",
        chrono::Local::now().format("%H:%M:%S"),
        notification.kind,
        notification.detail
    );
}

/// Acquire an exclusive lock on the lock file.
fn acquire_lock(lock_path: &Path) -> Result<File> {
    use fs2::FileExt;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;

    // Non-blocking: a second watcher fails fast.
    file.try_lock_exclusive()
        .map_err(|_| Error::LockHeld(lock_path.display().to_string()))?;

    Ok(file)
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
