// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoint registry commands.

use lifeline_core::{EndpointClass, EndpointPatch, EndpointRecord, NewEndpoint};
use serde::Serialize;

use super::{format_endpoint, print_json, Context};
use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::monitor::RefreshOutcome;

pub fn list(ctx: &Context, output: OutputFormat) -> Result<()> {
    let endpoints = ctx.manager.registry().list();
    match output {
        OutputFormat::Json => print_json(&endpoints)?,
        OutputFormat::Text => {
            if endpoints.is_empty() {
                println!("No endpoints registered.");
            }
            for endpoint in &endpoints {
                println!("{}", format_endpoint(endpoint));
            }
        }
    }
    Ok(())
}

pub fn add(ctx: &Context, name: String, url: String, class: EndpointClass, priority: i32) -> Result<()> {
    let endpoint = ctx.manager.registry().add(
        NewEndpoint::new(name, url)
            .with_class(class)
            .with_priority(priority),
    )?;
    println!("Added {} ({})", endpoint.id, endpoint.name);
    Ok(())
}

pub fn remove(ctx: &Context, id: &str) -> Result<()> {
    if ctx.manager.registry().remove(id)? {
        println!("Removed {}", id);
    } else {
        println!("No endpoint {}; nothing removed", id);
    }
    Ok(())
}

pub fn edit(ctx: &Context, id: &str, patch: EndpointPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(Error::InvalidInput(
            "nothing to change\n  hint: pass --name, --url, --class or --priority".to_string(),
        ));
    }
    let endpoint = ctx.manager.registry().edit(id, patch)?;
    println!("{}", format_endpoint(&endpoint));
    Ok(())
}

#[derive(Serialize)]
struct CheckReport {
    endpoints: Vec<EndpointRecord>,
    best: Option<EndpointRecord>,
}

/// Probe every endpoint once. Does not touch the sync queue.
pub async fn check(ctx: &Context, output: OutputFormat) -> Result<()> {
    let best = match ctx.manager.monitor().refresh().await {
        RefreshOutcome::Completed { active, .. } => active,
        RefreshOutcome::Coalesced | RefreshOutcome::SkippedTransportOffline => None,
    };
    let report = CheckReport {
        endpoints: ctx.manager.registry().list(),
        best,
    };

    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            for endpoint in &report.endpoints {
                println!("{}", format_endpoint(endpoint));
            }
            println!();
            match &report.best {
                Some(best) => println!("Best: {} ({})", best.id, best.url),
                None => println!("Best: none reachable"),
            }
        }
    }
    Ok(())
}
