// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness probes against a single endpoint.
//!
//! Provides a trait-based prober so that selection and monitoring can run
//! against mock probers in tests and a real HTTP prober in production.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Hard limit on a single probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default reachability path appended to an endpoint url.
pub const DEFAULT_HEALTH_PATH: &str = "/health";

/// Result of one probe. Failures of every kind collapse to `online = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub online: bool,
    /// Whole milliseconds from request start to response, or
    /// [`lifeline_core::LATENCY_FAILED`] when unreachable.
    pub latency_ms: i64,
}

impl ProbeOutcome {
    pub fn reachable(latency_ms: i64) -> Self {
        ProbeOutcome {
            online: true,
            latency_ms,
        }
    }

    pub fn unreachable() -> Self {
        ProbeOutcome {
            online: false,
            latency_ms: lifeline_core::LATENCY_FAILED,
        }
    }
}

/// Boxed future returned by [`Prober::probe`].
pub type ProbeFuture<'a> = Pin<Box<dyn Future<Output = ProbeOutcome> + Send + 'a>>;

/// Something that can check whether an endpoint is reachable.
pub trait Prober: Send + Sync {
    /// Probe the endpoint at `url`. Never fails; unreachable is a value.
    fn probe<'a>(&'a self, url: &'a str) -> ProbeFuture<'a>;
}

/// Prober issuing an unauthenticated `HEAD` against `<url><health_path>`.
///
/// Any HTTP response below 500 proves the server is alive, including
/// 401/404 from auth-gated or unknown paths.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    health_path: String,
    timeout: Duration,
}

impl HttpProber {
    /// Create a prober with the given health path and hard timeout.
    pub fn new(health_path: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(HttpProber {
            client,
            health_path: health_path.to_string(),
            timeout,
        })
    }

    /// The full probe address for an endpoint url.
    pub fn probe_url(&self, url: &str) -> String {
        join_url(url, &self.health_path)
    }
}

impl Prober for HttpProber {
    fn probe<'a>(&'a self, url: &'a str) -> ProbeFuture<'a> {
        Box::pin(async move {
            let target = self.probe_url(url);
            let start = Instant::now();

            let result = tokio::time::timeout(self.timeout, self.client.head(&target).send()).await;

            match result {
                Ok(Ok(response)) if !response.status().is_server_error() => {
                    let latency_ms = elapsed_ms(start);
                    tracing::debug!(url = %target, latency_ms, status = %response.status(), "probe succeeded");
                    ProbeOutcome::reachable(latency_ms)
                }
                Ok(Ok(response)) => {
                    tracing::debug!(url = %target, status = %response.status(), "probe got server error");
                    ProbeOutcome::unreachable()
                }
                Ok(Err(e)) => {
                    tracing::debug!(url = %target, error = %e, "probe failed");
                    ProbeOutcome::unreachable()
                }
                Err(_) => {
                    tracing::debug!(url = %target, timeout_ms = self.timeout.as_millis() as u64, "probe timed out");
                    ProbeOutcome::unreachable()
                }
            }
        })
    }
}

/// Join a base url and a path without doubling or dropping the slash.
pub fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn elapsed_ms(start: Instant) -> i64 {
    let ms = start.elapsed().as_secs_f64() * 1000.0;
    ms.round() as i64
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
