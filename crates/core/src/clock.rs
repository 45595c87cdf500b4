// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Adjusted clock for server-relative time.
//!
//! The server is authoritative about what time it is on the journey. Each
//! successful sync reports the server's `now` plus a `timeOffset`, and the
//! clock stores the difference against the local wall clock:
//!
//! ```text
//! offset   = server_now + server_time_offset - local_now
//! adjusted = local_now + (debug_override OR offset)
//! ```
//!
//! A debug override, when present, always wins over the learned offset.
//! All times are milliseconds since the Unix epoch.

use chrono::{DateTime, TimeZone, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> i64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
    }
}

impl<C: ClockSource> ClockSource for &C {
    fn now_ms(&self) -> i64 {
        (*self).now_ms()
    }
}

/// Local wall clock corrected by an offset learned from the server.
#[derive(Debug, Clone)]
pub struct Clock<C: ClockSource = SystemClock> {
    source: C,
    offset: i64,
    debug_override: Option<i64>,
}

impl Clock<SystemClock> {
    /// Creates a clock backed by the system wall clock.
    pub fn new() -> Self {
        Self::with_source(SystemClock)
    }
}

impl Default for Clock<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> Clock<C> {
    /// Creates a clock with a custom wall clock source and no offset.
    pub fn with_source(source: C) -> Self {
        Clock { source, offset: 0, debug_override: None }
    }

    /// Pins adjusted time so that it reads `timestamp` right now and then
    /// advances with the wall clock.
    ///
    /// The override is stored relative to the wall clock, so it keeps
    /// winning over any offset learned later.
    pub fn with_override(mut self, timestamp: i64) -> Self {
        self.debug_override = Some(timestamp.saturating_sub(self.source.now_ms()));
        self
    }

    /// Returns the adjusted time in milliseconds since Unix epoch.
    pub fn now(&self) -> i64 {
        self.source.now_ms().saturating_add(self.debug_override.unwrap_or(self.offset))
    }

    /// Returns the adjusted time as a UTC date.
    pub fn date_now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.now()).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns the uncorrected local wall clock.
    pub fn wall_ms(&self) -> i64 {
        self.source.now_ms()
    }

    /// Returns the offset learned from the last successful sync.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Returns whether a debug override is active.
    pub fn is_overridden(&self) -> bool {
        self.debug_override.is_some()
    }

    /// Learns the server offset from a sync response.
    ///
    /// Saturates at the `i64` bounds; responses whose offsets overflow are
    /// rejected before they get here.
    pub fn set_offset(&mut self, server_now: i64, server_time_offset: i64) {
        self.offset =
            server_now.saturating_add(server_time_offset).saturating_sub(self.source.now_ms());
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
