// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::stop::StopRecord;
use yare::parameterized;

fn record(id: &str, arrival: i64, departure: i64, lat: f64, lng: f64, presents: u64) -> StopRecord {
    StopRecord {
        id: id.to_string(),
        arrival,
        departure,
        location: LatLng::new(lat, lng),
        presents_delivered: presents,
        distance_travelled: None,
        city: None,
        region: None,
        population: None,
        details: None,
    }
}

/// Two-stop route: takeoff at 0 and a single stop at 100.
fn two_stops() -> Route {
    let mut first = record("s0", 0, 0, 0.0, 0.0, 0);
    first.distance_travelled = Some(0.0);
    let mut second = record("s1", 100, 100, 10.0, 10.0, 50);
    second.distance_travelled = Some(1000.0);
    Route::from_records(vec![first, second])
}

fn three_stops() -> Route {
    Route::from_records(vec![
        record("home", 0, 0, 0.0, 0.0, 0),
        record("a", 100, 200, 0.0, 10.0, 1000),
        record("b", 300, 400, 0.0, 20.0, 3000),
    ])
}

#[test]
fn in_transit_midpoint() {
    let route = two_stops();
    let progress = interpolate(&route, 50, None);
    let state = progress.state().unwrap();

    assert_eq!(state.phase, Phase::InTransit);
    // 0 + (50 - 0) * 0.3 * (50 / 100)
    assert_eq!(state.presents_delivered, 7);
    assert!((state.distance_travelled - 500.0).abs() < 1e-9);
    assert_eq!(state.prev, 0);
    assert_eq!(state.next, 1);
    assert_eq!(state.stopover, None);

    let midpoint = route.get(0).unwrap().location.interpolate(&route.get(1).unwrap().location, 0.5);
    assert!((state.position.lat - midpoint.lat).abs() < 1e-9);
    assert!((state.position.lng - midpoint.lng).abs() < 1e-9);
}

#[test]
fn in_transit_heading_points_at_next_stop() {
    let route = three_stops();
    let state = interpolate(&route, 250, None).state().cloned().unwrap();
    // Flying due east along the equator.
    assert!((state.heading - 90.0).abs() < 1e-6);
}

#[test]
fn at_stop_parks_on_location() {
    let route = three_stops();
    let state = interpolate(&route, 150, None).state().cloned().unwrap();

    assert_eq!(state.phase, Phase::AtStop);
    assert_eq!(state.position, route.get(1).unwrap().location);
    assert_eq!(state.heading, 0.0);
    assert_eq!(state.stopover, Some(1));
    assert_eq!(state.prev, 0);
    assert_eq!(state.next, 2);
    // 0 + 1000 * 0.3 + 1000 * 0.7 * (50 / 100)
    assert_eq!(state.presents_delivered, 650);
}

#[test]
fn presents_are_continuous_at_arrival() {
    let route = three_stops();
    let before = interpolate(&route, 99, None).state().cloned().unwrap();
    let arrived = interpolate(&route, 100, None).state().cloned().unwrap();

    assert_eq!(before.phase, Phase::InTransit);
    assert_eq!(arrived.phase, Phase::AtStop);
    assert_eq!(arrived.presents_delivered, 300);
    assert!(before.presents_delivered <= arrived.presents_delivered);
    assert!(arrived.presents_delivered - before.presents_delivered <= 3);
}

#[test]
fn presents_are_continuous_at_departure() {
    let route = three_stops();
    let leaving = interpolate(&route, 199, None).state().cloned().unwrap();
    let left = interpolate(&route, 200, None).state().cloned().unwrap();

    assert_eq!(leaving.phase, Phase::AtStop);
    assert_eq!(left.phase, Phase::InTransit);
    assert_eq!(left.presents_delivered, 1000);
    assert!(left.presents_delivered - leaving.presents_delivered <= 7);
}

#[test]
fn presents_never_decrease() {
    let route = three_stops();
    let mut last = 0;
    for now in 0..300 {
        let delivered = interpolate(&route, now, None).state().unwrap().presents_delivered;
        assert!(delivered >= last, "dropped from {last} to {delivered} at {now}");
        last = delivered;
    }
}

#[test]
fn zero_length_stop_does_not_divide_by_zero() {
    let route = Route::from_records(vec![
        record("home", 0, 0, 0.0, 0.0, 0),
        record("a", 100, 100, 0.0, 10.0, 1000),
        record("b", 300, 300, 0.0, 20.0, 3000),
    ]);
    let state = interpolate(&route, 100, None).state().cloned().unwrap();
    assert_eq!(state.phase, Phase::InTransit);
    assert_eq!(state.presents_delivered, 1000);

    let stop = route.get(1).unwrap();
    assert_eq!(presents_at_stop(100, route.get(0).unwrap(), stop), 300);
}

#[test]
fn empty_route_has_no_stops() {
    assert_eq!(interpolate(&Route::new(), 0, None), Progress::Unavailable(Unavailable::NoStops));
}

#[parameterized(
    before_first_arrival = { -500 },
    waiting_at_first_stop = { 5 },
)]
fn before_takeoff_is_not_departed(now: i64) {
    let route = Route::from_records(vec![
        record("home", 0, 10, 0.0, 0.0, 0),
        record("a", 100, 200, 0.0, 10.0, 1000),
    ]);
    assert_eq!(interpolate(&route, now, None), Progress::Unavailable(Unavailable::NotDeparted));
}

#[test]
fn after_last_departure_is_finished() {
    let route = three_stops();
    assert_eq!(interpolate(&route, 400, None), Progress::Unavailable(Unavailable::Finished));
    assert_eq!(interpolate(&route, 10_000, None), Progress::Unavailable(Unavailable::Finished));
}

#[test]
fn at_final_stop_is_still_ready() {
    let route = three_stops();
    let state = interpolate(&route, 350, None).state().cloned().unwrap();
    assert_eq!(state.stopover, Some(2));
    assert_eq!(state.next, 2);
}

#[test]
fn user_context_adds_distance_and_arrival() {
    let route = three_stops();
    let user = UserContext { location: LatLng::new(0.0, 20.0), destination: Some(2) };
    let state = interpolate(&route, 150, Some(&user)).state().cloned().unwrap();

    let expected = LatLng::new(0.0, 10.0).distance_to(&user.location);
    assert!((state.distance_to_user.unwrap() - expected).abs() < 1e-6);
    assert_eq!(state.user_arrival, Some(300));
}

#[test]
fn user_without_destination_has_no_arrival() {
    let route = three_stops();
    let user = UserContext { location: LatLng::new(45.0, 45.0), destination: None };
    let state = interpolate(&route, 150, Some(&user)).state().cloned().unwrap();
    assert!(state.distance_to_user.is_some());
    assert_eq!(state.user_arrival, None);
}

#[test]
fn distance_in_transit_interpolates_linearly() {
    let route = two_stops();
    let (prev, next) = (route.get(0).unwrap(), route.get(1).unwrap());
    assert_eq!(distance_in_transit(0, prev, next), 0.0);
    assert_eq!(distance_in_transit(25, prev, next), 250.0);
    assert_eq!(distance_in_transit(100, prev, next), 1000.0);
}

#[test]
fn progress_serializes_with_status_tag() {
    let json = serde_json::to_value(Progress::Unavailable(Unavailable::NotSynced)).unwrap();
    assert_eq!(json["status"], "unavailable");
    assert_eq!(json["state"], "not_synced");
}

#[test]
fn extreme_timestamps_do_not_overflow() {
    let route = Route::from_records(vec![
        record("a", i64::MIN, i64::MIN, 0.0, 0.0, 0),
        record("b", 0, i64::MAX, 0.0, 10.0, 100),
        record("c", i64::MAX, i64::MAX, 0.0, 20.0, 200),
    ]);

    let state = interpolate(&route, 0, None).state().cloned().unwrap();
    assert_eq!(state.phase, Phase::AtStop);
    assert_eq!(state.presents_delivered, 30);

    let state = interpolate(&route, -1, None).state().cloned().unwrap();
    assert_eq!(state.phase, Phase::InTransit);
    assert!(state.distance_travelled.is_finite());
    assert_eq!(route.get(1).unwrap().stay_ms(), i64::MAX);
}
