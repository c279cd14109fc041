// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! lifeline - endpoint resilience for a hosted chat backend.
//!
//! This crate provides the client side of the resilience layer and the
//! `lifeline` CLI: health probing, best-endpoint selection, the connectivity
//! monitor, and replay of the offline sync queue.
//!
//! # Main Components
//!
//! - [`ResilienceManager`] - owns the registry, emergency override, queue and monitor
//! - [`monitor::ConnectivityMonitor`] - effective online state and the active endpoint
//! - [`selector::EndpointSelector`] - concurrent probing and ranking
//! - [`probe::Prober`] / [`sync::Replayer`] - network seams, with reqwest implementations
//! - [`Config`] - `config.toml` in the state directory
//!
//! # Embedding
//!
//! ```rust,ignore
//! use lifeline::{Config, ResilienceManager, LogNotifier};
//! use lifeline::probe::HttpProber;
//! use lifeline::sync::{HttpReplayer, REPLAY_TIMEOUT};
//!
//! let config = Config::load(&state_dir)?;
//! let manager = ResilienceManager::new(
//!     Arc::new(FileStore::open(&state_dir)?),
//!     Arc::new(HttpProber::new(&config.health_path, config.probe_timeout())?),
//!     Arc::new(HttpReplayer::new(&config.replay_path, REPLAY_TIMEOUT)?),
//!     Arc::new(LogNotifier),
//!     config.manager_config(),
//! );
//! manager.refresh().await;
//! ```

mod cli;
mod commands;
pub mod env;

pub mod config;
pub mod error;
pub mod manager;
pub mod monitor;
pub mod notify;
pub mod probe;
pub mod selector;
pub mod sync;

#[cfg(test)]
mod test_helpers;

pub use cli::{Cli, Command, EmergencyCommand, OutputFormat, QueueCommand, ServersCommand};
pub use config::Config;
pub use error::{Error, Result};
pub use manager::{ManagerConfig, MonitorSnapshot, ResilienceManager, SubmitOutcome};
pub use notify::{LogNotifier, NotificationKind, Notifier};

use commands::Context;
use lifeline_core::EndpointPatch;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let state_dir = env::resolve_state_dir(cli.state_dir.as_deref())?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))?;
    let result = rt.block_on(dispatch(&state_dir, cli.command));
    // A watcher may leave a blocking stdin read behind.
    rt.shutdown_background();
    result
}

async fn dispatch(state_dir: &std::path::Path, command: Command) -> Result<()> {
    let open = || Context::open(state_dir);
    match command {
        Command::Servers(cmd) => servers(&open()?, cmd).await,
        Command::Emergency(cmd) => emergency(&open()?, cmd),
        Command::Queue(cmd) => queue(&open()?, cmd).await,
        Command::Status { output } => commands::status::run(&open()?, output).await,
        // The watcher wires its own notifier.
        Command::Watch => commands::watch::run(state_dir).await,
    }
}

async fn servers(ctx: &Context, cmd: ServersCommand) -> Result<()> {
    match cmd {
        ServersCommand::List { output } => commands::servers::list(ctx, output),
        ServersCommand::Add {
            name,
            url,
            class,
            priority,
        } => commands::servers::add(ctx, name, url, class, priority),
        ServersCommand::Remove { id } => commands::servers::remove(ctx, &id),
        ServersCommand::Edit {
            id,
            name,
            url,
            class,
            priority,
        } => commands::servers::edit(
            ctx,
            &id,
            EndpointPatch {
                name,
                url,
                class,
                priority,
            },
        ),
        ServersCommand::Check { output } => commands::servers::check(ctx, output).await,
    }
}

fn emergency(ctx: &Context, cmd: EmergencyCommand) -> Result<()> {
    match cmd {
        EmergencyCommand::Show { output } => commands::emergency::show(ctx, output),
        EmergencyCommand::Set {
            enabled,
            offline,
            low_bandwidth,
            p2p,
        } => commands::emergency::set(
            ctx,
            commands::emergency::EmergencyUpdate {
                enabled,
                offline_mode: offline,
                low_bandwidth_mode: low_bandwidth,
                p2p_enabled: p2p,
            },
        ),
    }
}

async fn queue(ctx: &Context, cmd: QueueCommand) -> Result<()> {
    match cmd {
        QueueCommand::Push { payload } => commands::queue::push(ctx, &payload),
        QueueCommand::List { output } => commands::queue::list(ctx, output),
        QueueCommand::Drain => commands::queue::drain(ctx).await,
        QueueCommand::Clear => commands::queue::clear(ctx),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
