// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod emergency;
pub mod queue;
pub mod servers;
pub mod status;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lifeline_core::{EndpointRecord, FileStore};
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::manager::ResilienceManager;
use crate::notify::{LogNotifier, Notifier};
use crate::probe::HttpProber;
use crate::sync::{HttpReplayer, REPLAY_TIMEOUT};

/// Everything a command needs, wired from one state directory.
pub struct Context {
    pub state_dir: PathBuf,
    pub config: Config,
    pub manager: Arc<ResilienceManager>,
}

impl Context {
    /// Open the state directory with notifications going to the log.
    pub fn open(state_dir: &Path) -> Result<Self> {
        Self::open_with_notifier(state_dir, Arc::new(LogNotifier))
    }

    pub fn open_with_notifier(state_dir: &Path, notifier: Arc<dyn Notifier>) -> Result<Self> {
        std::fs::create_dir_all(state_dir)?;
        let config = Config::load(state_dir)?;
        let store = Arc::new(FileStore::open(state_dir)?);
        let prober = Arc::new(HttpProber::new(&config.health_path, config.probe_timeout())?);
        let replayer = Arc::new(HttpReplayer::new(&config.replay_path, REPLAY_TIMEOUT)?);
        let manager = Arc::new(ResilienceManager::new(
            store,
            prober,
            replayer,
            notifier,
            config.manager_config(),
        ));
        tracing::debug!(state_dir = %state_dir.display(), "state directory opened");
        Ok(Context {
            state_dir: state_dir.to_path_buf(),
            config,
            manager,
        })
    }
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Latency column: `-` if never probed, `failed` for the failure sentinel.
pub(crate) fn format_latency(latency_ms: Option<i64>) -> String {
    match latency_ms {
        None => "-".to_string(),
        Some(ms) if ms < 0 => "failed".to_string(),
        Some(ms) => format!("{}ms", ms),
    }
}

/// One endpoint as a text line.
pub(crate) fn format_endpoint(endpoint: &EndpointRecord) -> String {
    format!(
        "{}  {}  {}  {}  {}  {}  p{}",
        endpoint.id,
        endpoint.name,
        endpoint.url,
        endpoint.class,
        endpoint.status,
        format_latency(endpoint.latency_ms),
        endpoint.priority
    )
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
