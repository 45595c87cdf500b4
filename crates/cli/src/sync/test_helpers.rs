// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use trek_core::protocol::SyncResponse;
use trek_core::{Card, ClockSource, LatLng, StopRecord};

/// Wall clock shared between a test and the engine it drives.
#[derive(Clone, Default)]
pub struct MockClock {
    time_ms: Arc<AtomicI64>,
}

impl MockClock {
    pub fn new(initial_ms: i64) -> Self {
        MockClock { time_ms: Arc::new(AtomicI64::new(initial_ms)) }
    }

    pub fn advance(&self, ms: i64) {
        self.time_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockSource for MockClock {
    fn now_ms(&self) -> i64 {
        self.time_ms.load(Ordering::SeqCst)
    }
}

/// Create a stop on the equator, one degree of longitude per index.
pub fn make_stop(id: &str, index: usize, arrival: i64, departure: i64, presents: u64) -> StopRecord {
    StopRecord {
        id: id.to_string(),
        arrival,
        departure,
        location: LatLng::new(0.0, index as f64),
        presents_delivered: presents,
        distance_travelled: None,
        city: None,
        region: None,
        population: None,
        details: None,
    }
}

/// Create a status card.
pub fn make_card(timestamp: i64, status: &str) -> Card {
    Card { status: Some(status.to_string()), ..Card::at(timestamp) }
}

/// Create a successful response where server time equals `now`.
pub fn ok_response(now: i64, fingerprint: &str) -> SyncResponse {
    let mut response = SyncResponse::ok(now, 60_000);
    response.fingerprint = fingerprint.to_string();
    response
}
