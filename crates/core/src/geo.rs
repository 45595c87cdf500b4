// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Spherical geometry on latitude/longitude pairs.
//!
//! Headings are degrees clockwise from north in `[-180, 180)`. Distances
//! are metres on a sphere with the WGS84 equatorial radius.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Earth's radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Below this the endpoints are treated as the same point when interpolating.
const MIN_SIN_ANGLE: f64 = 1e-6;

/// A point on the Earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new point.
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// Returns the central angle to another point, in radians (haversine).
    pub fn angle_to(&self, to: &LatLng) -> f64 {
        let from_lat = self.lat.to_radians();
        let to_lat = to.lat.to_radians();
        let d_lat = from_lat - to_lat;
        let d_lng = self.lng.to_radians() - to.lng.to_radians();
        let h = (d_lat / 2.0).sin().powi(2)
            + from_lat.cos() * to_lat.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * h.sqrt().asin()
    }

    /// Returns the great-circle distance to another point, in metres.
    pub fn distance_to(&self, to: &LatLng) -> f64 {
        self.angle_to(to) * EARTH_RADIUS_M
    }

    /// Returns the initial heading towards another point.
    pub fn heading_to(&self, to: &LatLng) -> f64 {
        let from_lat = self.lat.to_radians();
        let to_lat = to.lat.to_radians();
        let d_lng = to.lng.to_radians() - self.lng.to_radians();
        let heading = (d_lng.sin() * to_lat.cos())
            .atan2(from_lat.cos() * to_lat.sin() - from_lat.sin() * to_lat.cos() * d_lng.cos());
        wrap(heading.to_degrees(), -180.0, 180.0)
    }

    /// Returns the point `fraction` of the way along the great circle to
    /// `to` (spherical linear interpolation).
    ///
    /// A fraction of `0.0` yields `self` exactly.
    pub fn interpolate(&self, to: &LatLng, fraction: f64) -> LatLng {
        let angle = self.angle_to(to);
        let sin_angle = angle.sin();
        if sin_angle < MIN_SIN_ANGLE || fraction == 0.0 {
            return *self;
        }
        let a = ((1.0 - fraction) * angle).sin() / sin_angle;
        let b = (fraction * angle).sin() / sin_angle;

        let from_lat = self.lat.to_radians();
        let from_lng = self.lng.to_radians();
        let to_lat = to.lat.to_radians();
        let to_lng = to.lng.to_radians();

        let x = a * from_lat.cos() * from_lng.cos() + b * to_lat.cos() * to_lng.cos();
        let y = a * from_lat.cos() * from_lng.sin() + b * to_lat.cos() * to_lng.sin();
        let z = a * from_lat.sin() + b * to_lat.sin();

        LatLng {
            lat: z.atan2((x * x + y * y).sqrt()).to_degrees(),
            lng: y.atan2(x).to_degrees(),
        }
    }

    /// Rough bounding box for Europe, used to gate consent-style UI.
    pub fn in_europe(&self) -> bool {
        !(self.lng > 39.869 || self.lng < -31.266 || self.lat > 81.008 || self.lat < 27.636)
    }
}

/// Wraps `value` into the half-open interval `[min, max)`.
fn wrap(value: f64, min: f64, max: f64) -> f64 {
    (value - min).rem_euclid(max - min) + min
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = Error;

    /// Parses the `"lat,lng"` form used by geo-ip lookups.
    fn from_str(s: &str) -> Result<Self, Error> {
        let (lat, lng) =
            s.split_once(',').ok_or_else(|| Error::InvalidLocation(s.to_string()))?;
        let lat = lat.trim().parse::<f64>().map_err(|_| Error::InvalidLocation(s.to_string()))?;
        let lng = lng.trim().parse::<f64>().map_err(|_| Error::InvalidLocation(s.to_string()))?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(Error::InvalidLocation(s.to_string()));
        }
        Ok(LatLng::new(lat, lng))
    }
}

#[cfg(test)]
#[path = "geo_tests.rs"]
mod tests;
