// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Position and progress interpolation between stops.
//!
//! Each query is in exactly one of two phases, chosen against the
//! current stop's departure:
//!
//! - **At stop** (`now < departure`): parked at the stop, heading 0.
//! - **In transit** (`now >= departure`): slerp towards the next stop.
//!
//! Each leg's presents are split between the flight
//! ([`OVER_WATER_FRACTION`]) and the stop at its end ([`IN_CITY_FRACTION`]).

use serde::Serialize;

use crate::geo::LatLng;
use crate::stop::{Route, Stop};

/// Share of a leg's presents delivered while flying.
pub const OVER_WATER_FRACTION: f64 = 0.3;

/// Share of a leg's presents delivered while stopped.
pub const IN_CITY_FRACTION: f64 = 1.0 - OVER_WATER_FRACTION;

/// Guards the division for zero-length stops.
const MIN_STAY_MS: f64 = 1e-10;

/// Search radius when matching the user to a stop.
pub const NEAREST_STOP_LIMIT_M: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AtStop,
    InTransit,
}

/// Why no journey state could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unavailable {
    /// The route is empty.
    NoStops,
    /// The journey has not left its first stop yet.
    NotDeparted,
    /// The journey left its final stop; there is no next stop.
    Finished,
    /// No sync has succeeded yet.
    NotSynced,
}

/// Interpolated journey state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyState {
    pub phase: Phase,
    pub position: LatLng,
    pub heading: f64,
    pub presents_delivered: u64,
    pub distance_travelled: f64,
    /// Route index of the stop before the current leg or stop.
    pub prev: usize,
    /// Route index of the stop currently visited, when at a stop.
    pub stopover: Option<usize>,
    /// Route index of the upcoming stop.
    pub next: usize,
    /// Metres from the current position to the user, when known.
    pub distance_to_user: Option<f64>,
    /// Arrival time at the stop nearest the user, when known.
    pub user_arrival: Option<i64>,
}

/// Result of a progress query. Never an error: "not ready" is a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "state", rename_all = "snake_case")]
pub enum Progress {
    Ready(JourneyState),
    Unavailable(Unavailable),
}

impl Progress {
    pub fn state(&self) -> Option<&JourneyState> {
        match self {
            Progress::Ready(state) => Some(state),
            Progress::Unavailable(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Progress::Ready(_))
    }
}

/// What is known about the user watching the journey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserContext {
    pub location: LatLng,
    /// Route index of the stop nearest the user.
    pub destination: Option<usize>,
}

/// Milliseconds from `earlier` to `later`, computed in floating point so
/// extreme timestamps cannot overflow.
fn span(later: i64, earlier: i64) -> f64 {
    later as f64 - earlier as f64
}

fn floor_count(value: f64) -> u64 {
    if value <= 0.0 {
        0
    } else {
        value.floor() as u64
    }
}

/// Presents delivered `now` while flying from `prev` to `next`.
pub fn presents_in_transit(now: i64, prev: &Stop, next: &Stop) -> u64 {
    let elapsed = span(now, prev.departure);
    let duration = span(next.arrival, prev.departure);
    let delivering =
        (next.presents_delivered as f64 - prev.presents_delivered as f64) * OVER_WATER_FRACTION;
    if duration <= 0.0 {
        return floor_count(prev.presents_delivered as f64 + delivering);
    }
    floor_count(prev.presents_delivered as f64 + delivering * elapsed / duration)
}

/// Presents delivered `now` while parked at `stop`, having come from `prev`.
pub fn presents_at_stop(now: i64, prev: &Stop, stop: &Stop) -> u64 {
    let elapsed = span(now, stop.arrival);
    let duration = span(stop.departure, stop.arrival).max(MIN_STAY_MS);
    let delivering = stop.presents_delivered as f64 - prev.presents_delivered as f64;
    floor_count(
        prev.presents_delivered as f64
            + delivering * OVER_WATER_FRACTION
            + delivering * IN_CITY_FRACTION * elapsed / duration,
    )
}

/// Cumulative distance `now` while flying from `prev` to `next`.
pub fn distance_in_transit(now: i64, prev: &Stop, next: &Stop) -> f64 {
    let travel_time = span(next.arrival, prev.departure);
    if travel_time <= 0.0 {
        return next.distance_travelled;
    }
    let elapsed = span(now, prev.departure);
    let leg = next.distance_travelled - prev.distance_travelled;
    prev.distance_travelled + leg * (elapsed / travel_time)
}

/// Computes the journey state at `now`.
pub fn interpolate(route: &Route, now: i64, user: Option<&UserContext>) -> Progress {
    let Some(index) = route.find_index(now) else {
        return Progress::Unavailable(Unavailable::NoStops);
    };
    let Some(stop) = route.get(index) else {
        return Progress::Unavailable(Unavailable::NoStops);
    };

    let mut state = if now < stop.departure {
        if index == 0 {
            return Progress::Unavailable(Unavailable::NotDeparted);
        }
        let Some(prev) = route.get(index - 1) else {
            return Progress::Unavailable(Unavailable::NoStops);
        };
        JourneyState {
            phase: Phase::AtStop,
            position: stop.location,
            heading: 0.0,
            presents_delivered: presents_at_stop(now, prev, stop),
            distance_travelled: stop.distance_travelled,
            prev: index - 1,
            stopover: Some(index),
            next: if index + 1 < route.len() { index + 1 } else { index },
            distance_to_user: None,
            user_arrival: None,
        }
    } else {
        let Some(next) = route.get(index + 1) else {
            return Progress::Unavailable(Unavailable::Finished);
        };
        let travel_time = span(next.arrival, stop.departure);
        let elapsed = span(now, stop.departure).max(0.0);
        let fraction = if travel_time > 0.0 { (elapsed / travel_time).min(1.0) } else { 1.0 };
        let position = stop.location.interpolate(&next.location, fraction);

        JourneyState {
            phase: Phase::InTransit,
            position,
            heading: position.heading_to(&next.location),
            presents_delivered: presents_in_transit(now, stop, next),
            distance_travelled: distance_in_transit(now, stop, next),
            prev: index,
            stopover: None,
            next: index + 1,
            distance_to_user: None,
            user_arrival: None,
        }
    };

    if let Some(user) = user {
        state.distance_to_user = Some(state.position.distance_to(&user.location));
        state.user_arrival = user.destination.and_then(|i| route.get(i)).map(|s| s.arrival);
    }

    Progress::Ready(state)
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
