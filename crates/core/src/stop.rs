// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Journey stops and the route that owns them.
//!
//! A [`Route`] is an arena of [`Stop`]s ordered by arrival. Stops never
//! link to each other directly: each one records its own index and
//! resolves neighbours by looking them up in the route. Truncating and
//! reloading the route therefore never leaves a dangling reference, only
//! an index that may point at a newer stop.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geo::LatLng;
use crate::progress::IN_CITY_FRACTION;
use crate::reconcile::Reconcile;

/// Rich per-stop content (weather, photos, timezone), opaque to the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopDetails(pub Map<String, Value>);

impl StopDetails {
    /// Returns a single detail field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// A stop as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecord {
    pub id: String,
    pub arrival: i64,
    pub departure: i64,
    pub location: LatLng,
    #[serde(default)]
    pub presents_delivered: u64,
    /// Cumulative metres; derived from the route geometry when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_travelled: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<StopDetails>,
}

/// A stop held in a [`Route`], decorated with its position and derived totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: String,
    pub arrival: i64,
    pub departure: i64,
    pub location: LatLng,
    pub presents_delivered: u64,
    pub distance_travelled: f64,
    /// Presents delivered while on the ground here (the in-city share of
    /// the leg that ends at this stop).
    pub presents_delivered_in_city: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    #[serde(skip)]
    pub details: Option<StopDetails>,
    index: usize,
}

impl Stop {
    fn decorate(record: StopRecord, index: usize, prev: Option<&Stop>) -> Self {
        let prev_delivered = prev.map_or(record.presents_delivered, |p| p.presents_delivered);
        let leg_delivered = record.presents_delivered.saturating_sub(prev_delivered);
        let distance_travelled = record.distance_travelled.unwrap_or_else(|| {
            prev.map_or(0.0, |p| p.distance_travelled + p.location.distance_to(&record.location))
        });

        Stop {
            id: record.id,
            arrival: record.arrival,
            departure: record.departure,
            location: record.location,
            presents_delivered: record.presents_delivered,
            distance_travelled,
            presents_delivered_in_city: (leg_delivered as f64 * IN_CITY_FRACTION).floor() as u64,
            city: record.city,
            region: record.region,
            population: record.population,
            details: record.details,
            index,
        }
    }

    /// Position of this stop in its route.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Previous stop in `route`; the first stop is its own predecessor.
    ///
    /// Returns `None` only if the route no longer reaches this index.
    pub fn prev<'r>(&self, route: &'r Route) -> Option<&'r Stop> {
        route.get(self.index.saturating_sub(1))
    }

    /// Next stop in `route`; the last stop is its own successor.
    pub fn next<'r>(&self, route: &'r Route) -> Option<&'r Stop> {
        route.get(self.index + 1).or_else(|| route.get(self.index).and_then(|_| route.last()))
    }

    /// Milliseconds spent on the ground.
    pub fn stay_ms(&self) -> i64 {
        self.departure.saturating_sub(self.arrival)
    }

    /// Human-readable place name, falling back to the id.
    pub fn name(&self) -> &str {
        self.city.as_deref().unwrap_or(&self.id)
    }
}

/// Ordered sequence of stops, indexed by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    /// Creates an empty route.
    pub fn new() -> Self {
        Route::default()
    }

    /// Builds a route from raw records, as if applied at index 0.
    pub fn from_records(records: Vec<StopRecord>) -> Self {
        let mut route = Route::new();
        route.apply(0, records);
        route
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Stop> {
        self.stops.get(index)
    }

    pub fn first(&self) -> Option<&Stop> {
        self.stops.first()
    }

    pub fn last(&self) -> Option<&Stop> {
        self.stops.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stop> {
        self.stops.iter()
    }

    pub fn as_slice(&self) -> &[Stop] {
        &self.stops
    }

    /// Finds the stop the journey is at, or most recently left, at `now`.
    ///
    /// Before the first departure this is the first stop. Otherwise it is
    /// the last stop whose arrival is not after `now`.
    pub fn find_index(&self, now: i64) -> Option<usize> {
        let first = self.stops.first()?;
        if first.departure > now {
            return Some(0);
        }
        let arrived = self.stops.partition_point(|s| s.arrival <= now);
        Some(arrived.saturating_sub(1))
    }

    /// Stops visited up to and including the current one at `now`.
    pub fn visited(&self, now: i64) -> &[Stop] {
        match self.find_index(now) {
            Some(index) => &self.stops[..=index],
            None => &[],
        }
    }

    /// Finds the stop nearest to `point` within `limit_m` metres.
    ///
    /// Stops more than 10 degrees of latitude away are skipped without
    /// computing a distance.
    pub fn nearest_index(&self, point: &LatLng, limit_m: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, stop) in self.stops.iter().enumerate() {
            if (point.lat - stop.location.lat).abs() > 10.0 {
                continue;
            }
            let dist = point.distance_to(&stop.location);
            if dist > limit_m || best.is_some_and(|(_, b)| dist >= b) {
                continue;
            }
            best = Some((i, dist));
        }
        best.map(|(i, _)| i)
    }
}

impl Reconcile for Route {
    type Incoming = StopRecord;

    const COLLECTION: &'static str = "destinations";

    fn reconciled_len(&self) -> usize {
        self.stops.len()
    }

    fn truncate_to(&mut self, len: usize) {
        self.stops.truncate(len);
    }

    fn append_one(&mut self, item: StopRecord) {
        let index = self.stops.len();
        let stop = Stop::decorate(item, index, self.stops.last());
        self.stops.push(stop);
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a Stop;
    type IntoIter = std::slice::Iter<'a, Stop>;

    fn into_iter(self) -> Self::IntoIter {
        self.stops.iter()
    }
}

#[cfg(test)]
#[path = "stop_tests.rs"]
mod tests;
