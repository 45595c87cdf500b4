// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{DetailsError, SyncError, TransportError};

/// All possible errors that can occur in the trekrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no config file at {0}\n  hint: run 'trek config init' to create one")]
    ConfigNotFound(String),

    #[error("config already exists at {0}\n  hint: pass --force to overwrite it")]
    ConfigExists(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid timestamp: {reason}\n  hint: use epoch milliseconds or RFC 3339, e.g. 2026-12-24T10:00:00Z")]
    InvalidTimestamp { reason: String },

    #[error("invalid endpoint '{0}'\n  hint: the endpoint must start with http:// or https://")]
    InvalidEndpoint(String),

    #[error("no stop at index {index} (route has {len} stops)")]
    StopNotFound { index: usize, len: usize },

    #[error("sync failed: {0}")]
    Sync(#[from] SyncError),

    #[error("{0}")]
    Details(#[from] DetailsError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    Core(#[from] trek_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for trekrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
