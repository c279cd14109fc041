// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoint types: the candidate servers a client may talk to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Latency recorded for an endpoint whose last probe failed.
pub const LATENCY_FAILED: i64 = -1;

/// Role of an endpoint within the deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointClass {
    /// The main hosted backend.
    #[default]
    Primary,
    /// A standby copy used when the primary is unreachable.
    Fallback,
    /// A server run by a third party that federates with the primary.
    Federated,
}

impl EndpointClass {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointClass::Primary => "primary",
            EndpointClass::Fallback => "fallback",
            EndpointClass::Federated => "federated",
        }
    }
}

impl fmt::Display for EndpointClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EndpointClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "primary" => Ok(EndpointClass::Primary),
            "fallback" => Ok(EndpointClass::Fallback),
            "federated" => Ok(EndpointClass::Federated),
            _ => Err(Error::InvalidClass(s.to_string())),
        }
    }
}

/// Observed reachability of an endpoint. Overwritten by every probe cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointStatus {
    Online,
    Offline,
    /// Added or edited but not yet probed.
    Checking,
}

impl EndpointStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointStatus::Online => "online",
            EndpointStatus::Offline => "offline",
            EndpointStatus::Checking => "checking",
        }
    }
}

impl fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EndpointStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "online" => Ok(EndpointStatus::Online),
            "offline" => Ok(EndpointStatus::Offline),
            "checking" => Ok(EndpointStatus::Checking),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// A registered endpoint.
///
/// `id` never changes after creation. `status` and `latency_ms` are
/// transient and rewritten by probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub class: EndpointClass,
    pub status: EndpointStatus,
    /// Round trip of the last probe in milliseconds, [`LATENCY_FAILED`] if it failed,
    /// `None` if never probed.
    #[serde(default)]
    pub latency_ms: Option<i64>,
    /// Lower is preferred.
    pub priority: i32,
}

impl EndpointRecord {
    /// Returns true if the last probe reached this endpoint.
    pub fn is_online(&self) -> bool {
        self.status == EndpointStatus::Online
    }

    /// Latency used for ranking. Unknown or failed latency sorts last.
    pub fn ranking_latency(&self) -> i64 {
        match self.latency_ms {
            Some(ms) if ms >= 0 => ms,
            _ => i64::MAX,
        }
    }
}

/// Fields supplied by the user when adding an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEndpoint {
    pub name: String,
    pub url: String,
    pub class: EndpointClass,
    pub priority: i32,
}

impl NewEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        NewEndpoint {
            name: name.into(),
            url: url.into(),
            class: EndpointClass::Primary,
            priority: 0,
        }
    }

    pub fn with_class(mut self, class: EndpointClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// An explicit user edit. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub class: Option<EndpointClass>,
    pub priority: Option<i32>,
}

impl EndpointPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.class.is_none() && self.priority.is_none()
    }
}

/// Check that a url is an absolute http(s) address.
pub fn validate_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
    if rest.trim_matches('/').is_empty() {
        return Err(Error::InvalidUrl(url.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
