// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use sha2::{Digest, Sha256};

/// Prefix for endpoint ids.
pub const ENDPOINT_PREFIX: &str = "srv";

/// Generate an endpoint ID from its name and creation time.
/// Format: srv-{hash} where hash is first 8 hex chars of SHA256(name + created_at_ms)
pub fn generate_endpoint_id(name: &str, created_at_ms: u64) -> String {
    let input = format!("{}{}", name, created_at_ms);
    let hash = Sha256::digest(input.as_bytes());
    let short_hash = hex::encode(&hash[..4]);
    format!("{}-{}", ENDPOINT_PREFIX, short_hash)
}

/// Generate a unique endpoint ID, handling collisions by appending an incrementing suffix.
pub fn generate_unique_endpoint_id<F>(name: &str, created_at_ms: u64, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base_id = generate_endpoint_id(name, created_at_ms);

    if !exists(&base_id) {
        return base_id;
    }

    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

/// Generate a queue item ID from the enqueue time and a per-process sequence number.
pub fn generate_queue_id(enqueued_at_ms: u64, seq: u64) -> String {
    format!("q-{}-{}", enqueued_at_ms, seq)
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
