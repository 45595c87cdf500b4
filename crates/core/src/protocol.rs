// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire payloads for the polling protocol.
//!
//! The client POSTs a [`SyncRequest`] telling the server how much it already
//! holds; the server answers with a [`SyncResponse`] carrying the batches
//! that replace everything from the given offsets onward.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::card::{Card, Stream};
use crate::error::{Error, Result};
use crate::geo::LatLng;
use crate::reconcile::cut_point;
use crate::stop::{Route, StopRecord};

/// The only status value that counts as success.
pub const STATUS_OK: &str = "OK";

/// Sent by the client on every poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Per-session jitter in `[0, 1)`.
    pub rand: f64,
    pub client: String,
    pub language: String,
    pub route_offset: usize,
    pub stream_offset: usize,
    pub fingerprint: String,
}

/// Returned by the server for every poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub status: String,
    /// Server wall clock in ms.
    pub now: i64,
    /// Extra skew the server wants applied on top of `now`.
    #[serde(default)]
    pub time_offset: i64,
    #[serde(default)]
    pub switch_off: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_to_version: Option<String>,
    #[serde(default)]
    pub fingerprint: String,
    /// Opaque per-client kill switches.
    #[serde(default)]
    pub client_specific: Map<String, Value>,
    /// The user's location as `"lat,lng"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub route_offset: usize,
    #[serde(default)]
    pub destinations: Vec<StopRecord>,
    #[serde(default)]
    pub stream_offset: usize,
    #[serde(default)]
    pub stream: Vec<Card>,
    /// Milliseconds until the next poll.
    pub refresh: i64,
}

impl SyncRequest {
    /// Serializes the request to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl SyncResponse {
    /// Creates a successful, empty response.
    pub fn ok(now: i64, refresh: i64) -> Self {
        SyncResponse {
            status: STATUS_OK.to_string(),
            now,
            time_offset: 0,
            switch_off: false,
            upgrade_to_version: None,
            fingerprint: String::new(),
            client_specific: Map::new(),
            location: None,
            route_offset: 0,
            destinations: Vec::new(),
            stream_offset: 0,
            stream: Vec::new(),
            refresh,
        }
    }

    /// Deserializes a response from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serializes the response to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns true if the server reported success and did not switch us off.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK && !self.switch_off
    }

    /// Parses the user's location, if one was sent.
    pub fn user_location(&self) -> Result<Option<LatLng>> {
        self.location.as_deref().map(str::parse::<LatLng>).transpose()
    }

    /// The poll interval the server dictated.
    pub fn refresh_interval(&self) -> Result<Duration> {
        if self.refresh <= 0 {
            return Err(Error::InvalidRefresh(self.refresh));
        }
        Ok(Duration::from_millis(self.refresh.unsigned_abs()))
    }

    /// Server time with the requested skew applied.
    pub fn server_time(&self) -> Result<i64> {
        self.now
            .checked_add(self.time_offset)
            .ok_or(Error::InvalidOffset { now: self.now, time_offset: self.time_offset })
    }

    /// Checks the payload against what the client already holds.
    ///
    /// Each batch must be sorted and must not start before the last
    /// element that survives the cut. Stops need an id, must not leave
    /// before they arrive, and never lower the running presents or
    /// distance totals.
    pub fn validate(&self, route: &Route, stream: &Stream) -> Result<()> {
        self.server_time()?;
        self.refresh_interval()?;
        self.user_location()?;

        if !self.destinations.is_empty() {
            let cut = cut_point(route.len(), self.route_offset);
            let mut previous = cut.checked_sub(1).and_then(|i| route.get(i)).map(|s| Totals {
                arrival: s.arrival,
                presents: s.presents_delivered,
                distance: s.distance_travelled,
                location: s.location,
            });
            for (i, stop) in self.destinations.iter().enumerate() {
                let position = cut + i;
                if stop.id.is_empty() {
                    return Err(Error::MissingStopId { position });
                }
                if stop.departure < stop.arrival {
                    return Err(Error::DepartureBeforeArrival {
                        id: stop.id.clone(),
                        arrival: stop.arrival,
                        departure: stop.departure,
                    });
                }
                check_order("destinations", position, stop.arrival, previous.map(|p| p.arrival))?;
                previous = Some(Totals::follow(previous.as_ref(), stop, position)?);
            }
        }

        if !self.stream.is_empty() {
            let cut = cut_point(stream.len(), self.stream_offset);
            let mut previous = cut.checked_sub(1).and_then(|i| stream.get(i)).map(|c| c.timestamp);
            for (i, card) in self.stream.iter().enumerate() {
                check_order("stream", cut + i, card.timestamp, previous)?;
                previous = Some(card.timestamp);
            }
        }

        Ok(())
    }
}

/// Running totals of the last accepted stop.
#[derive(Clone, Copy)]
struct Totals {
    arrival: i64,
    presents: u64,
    distance: f64,
    location: LatLng,
}

impl Totals {
    /// Totals after `stop`, rejecting any decrease from `prev`.
    ///
    /// A missing distance is derived the same way the route decorates it.
    fn follow(prev: Option<&Totals>, stop: &StopRecord, position: usize) -> Result<Totals> {
        let distance = stop.distance_travelled.unwrap_or_else(|| {
            prev.map_or(0.0, |p| p.distance + p.location.distance_to(&stop.location))
        });
        if let Some(prev) = prev {
            let field = if stop.presents_delivered < prev.presents {
                Some("presentsDelivered")
            } else if distance < prev.distance {
                Some("distanceTravelled")
            } else {
                None
            };
            if let Some(field) = field {
                return Err(Error::Regressing { id: stop.id.clone(), field, position });
            }
        }
        Ok(Totals {
            arrival: stop.arrival,
            presents: stop.presents_delivered,
            distance,
            location: stop.location,
        })
    }
}

fn check_order(
    collection: &'static str,
    position: usize,
    timestamp: i64,
    previous: Option<i64>,
) -> Result<()> {
    match previous {
        Some(previous) if timestamp < previous => {
            Err(Error::OutOfOrder { collection, position, timestamp, previous })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
