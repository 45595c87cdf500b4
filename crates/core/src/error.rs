// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for trek-core operations.

use thiserror::Error;

/// All possible errors that can occur in trek-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid location: '{0}'\n  hint: expected \"lat,lng\" in decimal degrees")]
    InvalidLocation(String),

    #[error("stop at position {position} has no id")]
    MissingStopId { position: usize },

    #[error("stop {id}: departure {departure} precedes arrival {arrival}")]
    DepartureBeforeArrival {
        id: String,
        arrival: i64,
        departure: i64,
    },

    #[error("{collection} out of order at position {position}: {timestamp} < {previous}")]
    OutOfOrder {
        collection: &'static str,
        position: usize,
        timestamp: i64,
        previous: i64,
    },

    #[error("invalid server time: now {now} with offset {time_offset} overflows")]
    InvalidOffset { now: i64, time_offset: i64 },

    #[error("stop {id}: {field} decreases at position {position}")]
    Regressing {
        id: String,
        field: &'static str,
        position: usize,
    },

    #[error("invalid refresh interval: {0} ms\n  hint: the server must dictate a positive poll interval")]
    InvalidRefresh(i64),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for trek-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
