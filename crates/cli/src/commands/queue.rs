// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline sync queue commands.

use super::{print_json, Context};
use crate::cli::OutputFormat;
use crate::error::{Error, Result};

pub fn push(ctx: &Context, payload: &str) -> Result<()> {
    let payload: serde_json::Value = serde_json::from_str(payload).map_err(|e| {
        Error::InvalidInput(format!(
            "payload is not valid JSON: {}\n  hint: quote the payload, e.g. '{{\"text\":\"hi\"}}'",
            e
        ))
    })?;
    let item = ctx.manager.queue().enqueue(payload)?;
    println!("Queued {} ({} pending)", item.id, ctx.manager.queue().pending_count());
    Ok(())
}

pub fn list(ctx: &Context, output: OutputFormat) -> Result<()> {
    let items = ctx.manager.queue().peek_all();
    match output {
        OutputFormat::Json => print_json(&items)?,
        OutputFormat::Text => {
            if items.is_empty() {
                println!("Queue is empty.");
            }
            for item in &items {
                println!(
                    "{}  {}  retries={}  {}",
                    item.id,
                    item.enqueued_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    item.retry_count,
                    item.payload
                );
            }
        }
    }
    Ok(())
}

/// Probe, then replay the whole queue against the best endpoint.
pub async fn drain(ctx: &Context) -> Result<()> {
    ctx.manager.monitor().refresh().await;
    let report = ctx.manager.drain().await?;

    println!("Replayed {}, {} remaining", report.replayed, report.remaining);
    if let Some(halt) = &report.halted {
        println!(
            "Halted at {} (attempt {}): {}",
            halt.item_id, halt.retry_count, halt.reason
        );
    }
    Ok(())
}

pub fn clear(ctx: &Context) -> Result<()> {
    let dropped = ctx.manager.queue().clear()?;
    tracing::info!(dropped, "sync queue cleared");
    println!("Discarded {} queued item(s)", dropped);
    Ok(())
}
