// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use lifeline_core::EndpointClass;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn parse_class(s: &str) -> Result<EndpointClass, String> {
    s.parse().map_err(|e: lifeline_core::Error| e.to_string())
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "lifeline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Endpoint health monitoring, failover and offline sync queue")]
#[command(
    long_about = "Endpoint health monitoring, failover and offline sync queue.\n\n\
    Keeps a registry of candidate servers, probes them to pick the best one, and \
    buffers actions while offline so they can be replayed in order once a server \
    is reachable again."
)]
pub struct Cli {
    /// Directory holding the registry, queue and config.toml
    #[arg(long = "state-dir", global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage registered endpoints
    #[command(subcommand)]
    Servers(ServersCommand),

    /// Show or change the emergency override
    #[command(subcommand)]
    Emergency(EmergencyCommand),

    /// Inspect and replay the offline sync queue
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Probe endpoints once and show effective connectivity
    Status {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Run the connectivity monitor in the foreground
    #[command(after_help = "\
Transport signals are read from stdin, one per line:
  online    the network came back
  offline   the network dropped (everything is marked offline at once)
  refresh   probe now

Stop with Ctrl-C.")]
    Watch,
}

#[derive(Subcommand)]
pub enum ServersCommand {
    /// List registered endpoints
    List {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Register an endpoint
    #[command(allow_negative_numbers = true)]
    Add {
        #[arg(value_parser = non_empty_string)]
        name: String,
        url: String,
        /// primary, fallback or federated
        #[arg(long, value_parser = parse_class, default_value = "primary")]
        class: EndpointClass,
        /// Lower is preferred
        #[arg(long, default_value_t = 0)]
        priority: i32,
    },

    /// Remove an endpoint (no-op if absent)
    Remove { id: String },

    /// Change an endpoint's name, url, class or priority
    #[command(allow_negative_numbers = true)]
    Edit {
        id: String,
        #[arg(long, value_parser = non_empty_string)]
        name: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long, value_parser = parse_class)]
        class: Option<EndpointClass>,
        #[arg(long)]
        priority: Option<i32>,
    },

    /// Probe every endpoint and print the best one
    Check {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum EmergencyCommand {
    /// Show the current override
    Show {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Change flags; unspecified flags keep their value
    Set {
        #[arg(long, value_name = "bool")]
        enabled: Option<bool>,
        /// Treat every endpoint as unreachable
        #[arg(long, value_name = "bool")]
        offline: Option<bool>,
        #[arg(long = "low-bandwidth", value_name = "bool")]
        low_bandwidth: Option<bool>,
        #[arg(long, value_name = "bool")]
        p2p: Option<bool>,
    },
}

#[derive(Subcommand)]
pub enum QueueCommand {
    /// Append a JSON payload to the queue
    Push { payload: String },

    /// List queued items in replay order
    List {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Probe, then replay the queue against the best endpoint
    Drain,

    /// Discard every queued item without replaying it
    Clear,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
