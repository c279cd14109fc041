// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from `<state_dir>/config.toml`. Every field is
//! optional; a missing file means all defaults:
//! - `probe_timeout_ms`: upper bound on one health probe
//! - `refresh_interval_secs`: period of the monitor timer and minimum drain retry gap
//! - `health_path` / `replay_path`: sub-paths used for probes and replays
//! - `[default_endpoint]`: the endpoint used until the user registers their own

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lifeline_core::{EndpointClass, NewEndpoint};

use crate::error::{Error, Result};
use crate::manager::ManagerConfig;
use crate::monitor::MonitorConfig;
use crate::probe::DEFAULT_HEALTH_PATH;
use crate::sync::{DEFAULT_REPLAY_PATH, REPLAY_TIMEOUT};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Url of the built-in endpoint when none is configured.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:54321";

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    #[serde(default = "default_replay_path")]
    pub replay_path: String,
    #[serde(default)]
    pub default_endpoint: DefaultEndpointConfig,
}

/// The endpoint the registry reports before anything is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultEndpointConfig {
    #[serde(default = "default_endpoint_name")]
    pub name: String,
    #[serde(default = "default_endpoint_url")]
    pub url: String,
    #[serde(default)]
    pub class: EndpointClass,
    #[serde(default)]
    pub priority: i32,
}

fn default_probe_timeout_ms() -> u64 {
    5000
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_health_path() -> String {
    DEFAULT_HEALTH_PATH.to_string()
}

fn default_replay_path() -> String {
    DEFAULT_REPLAY_PATH.to_string()
}

fn default_endpoint_name() -> String {
    "Primary".to_string()
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

impl Default for DefaultEndpointConfig {
    fn default() -> Self {
        DefaultEndpointConfig {
            name: default_endpoint_name(),
            url: default_endpoint_url(),
            class: EndpointClass::default(),
            priority: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            probe_timeout_ms: default_probe_timeout_ms(),
            refresh_interval_secs: default_refresh_interval_secs(),
            health_path: default_health_path(),
            replay_path: default_replay_path(),
            default_endpoint: DefaultEndpointConfig::default(),
        }
    }
}

impl Config {
    /// Path of the config file inside `state_dir`.
    pub fn path(state_dir: &Path) -> PathBuf {
        state_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads configuration from `state_dir`, or defaults if there is no file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or parsed,
    /// or if it sets a zero timeout or interval.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = Self::path(state_dir);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.probe_timeout_ms == 0 {
            return Err(Error::Config("probe_timeout_ms must be greater than 0".to_string()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(Error::Config(
                "refresh_interval_secs must be greater than 0".to_string(),
            ));
        }
        lifeline_core::endpoint::validate_url(&self.default_endpoint.url)
            .map_err(|e| Error::Config(format!("default_endpoint: {}", e)))?;
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn default_endpoint(&self) -> NewEndpoint {
        let endpoint = &self.default_endpoint;
        NewEndpoint::new(endpoint.name.clone(), endpoint.url.clone())
            .with_class(endpoint.class)
            .with_priority(endpoint.priority)
    }

    /// Parameters for [`crate::manager::ResilienceManager::new`].
    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            monitor: MonitorConfig {
                probe_timeout: self.probe_timeout(),
                refresh_interval: self.refresh_interval(),
            },
            replay_timeout: REPLAY_TIMEOUT,
            default_endpoint: self.default_endpoint(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
