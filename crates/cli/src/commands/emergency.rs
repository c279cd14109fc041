// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Emergency override commands.

use lifeline_core::EmergencyConfig;

use super::{print_json, Context};
use crate::cli::OutputFormat;
use crate::error::Result;

/// Flags given on the command line; `None` keeps the stored value.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmergencyUpdate {
    pub enabled: Option<bool>,
    pub offline_mode: Option<bool>,
    pub low_bandwidth_mode: Option<bool>,
    pub p2p_enabled: Option<bool>,
}

impl EmergencyUpdate {
    pub fn apply(&self, mut config: EmergencyConfig) -> EmergencyConfig {
        if let Some(v) = self.enabled {
            config.enabled = v;
        }
        if let Some(v) = self.offline_mode {
            config.offline_mode = v;
        }
        if let Some(v) = self.low_bandwidth_mode {
            config.low_bandwidth_mode = v;
        }
        if let Some(v) = self.p2p_enabled {
            config.p2p_enabled = v;
        }
        config
    }
}

pub fn show(ctx: &Context, output: OutputFormat) -> Result<()> {
    let config = ctx.manager.emergency();
    match output {
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Text => print_text(&config),
    }
    Ok(())
}

pub fn set(ctx: &Context, update: EmergencyUpdate) -> Result<()> {
    let config = update.apply(ctx.manager.emergency());
    ctx.manager.set_emergency(config)?;
    print_text(&config);
    Ok(())
}

fn print_text(config: &EmergencyConfig) {
    println!("enabled: {}", config.enabled);
    println!("offline: {}", config.offline_mode);
    println!("low-bandwidth: {}", config.low_bandwidth_mode);
    println!("p2p: {}", config.p2p_enabled);
}

#[cfg(test)]
#[path = "emergency_tests.rs"]
mod tests;
