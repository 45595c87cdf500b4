// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cache and rate limit for deferred stop detail fetches.

use std::collections::HashMap;

use trek_core::StopDetails;

use super::transport::TransportError;

/// Minimum gap between two fetch attempts for the same stop.
pub const DETAILS_RATE_LIMIT_MS: i64 = 10_000;

/// Error type for stop detail lookups.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DetailsError {
    #[error("no stop at index {0}")]
    UnknownStop(usize),

    #[error("details for stop {id} were requested too recently\n  hint: retry in {retry_in_ms} ms")]
    RateLimited { id: String, retry_in_ms: i64 },

    #[error("details fetch failed: {0}")]
    Transport(#[from] TransportError),
}

/// What a lookup decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Details are already known.
    Cached(StopDetails),
    /// A fetch was attempted too recently.
    RateLimited { retry_in_ms: i64 },
    /// The caller should fetch now; the attempt has been recorded.
    Fetch,
}

/// Details fetched under the current fingerprint, keyed by stop id.
#[derive(Debug, Default)]
pub struct DetailsCache {
    entries: HashMap<String, StopDetails>,
    attempts: HashMap<String, i64>,
}

impl DetailsCache {
    pub fn new() -> Self {
        DetailsCache::default()
    }

    /// Decides how to serve details for `id` at `now_ms`.
    pub fn begin(&mut self, id: &str, now_ms: i64) -> Lookup {
        if let Some(details) = self.entries.get(id) {
            return Lookup::Cached(details.clone());
        }
        if let Some(last) = self.attempts.get(id) {
            let elapsed = now_ms.saturating_sub(*last);
            if elapsed < DETAILS_RATE_LIMIT_MS {
                return Lookup::RateLimited { retry_in_ms: DETAILS_RATE_LIMIT_MS - elapsed };
            }
        }
        self.attempts.insert(id.to_string(), now_ms);
        Lookup::Fetch
    }

    pub fn insert(&mut self, id: impl Into<String>, details: StopDetails) {
        self.entries.insert(id.into(), details);
    }

    /// Forgets everything, for use when the fingerprint changes.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.attempts.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
