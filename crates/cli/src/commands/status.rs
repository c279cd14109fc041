// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot connectivity status.

use super::{print_json, Context};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::manager::MonitorSnapshot;

/// Run one refresh pass and print the resulting snapshot.
pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    ctx.manager.monitor().refresh().await;
    let snapshot = ctx.manager.snapshot();
    match output {
        OutputFormat::Json => print_json(&snapshot)?,
        OutputFormat::Text => {
            for line in render(&snapshot) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

pub(crate) fn render(snapshot: &MonitorSnapshot) -> Vec<String> {
    let mut lines = vec![format!("Status: {}", snapshot.detail)];
    match &snapshot.active_endpoint {
        Some(endpoint) => lines.push(format!(
            "Active: {} {} ({})",
            endpoint.id,
            endpoint.url,
            super::format_latency(endpoint.latency_ms)
        )),
        None => lines.push("Active: none".to_string()),
    }
    if snapshot.emergency.offline_mode {
        lines.push("Emergency: offline mode".to_string());
    } else if snapshot.emergency.enabled {
        lines.push("Emergency: enabled".to_string());
    }
    lines.push(format!("Pending: {}", snapshot.pending));
    match snapshot.last_refresh {
        Some(ts) => lines.push(format!("Last refresh: {}", ts.format("%Y-%m-%d %H:%M:%S UTC"))),
        None => lines.push("Last refresh: never".to_string()),
    }
    lines
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
