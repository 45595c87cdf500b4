// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::geo::LatLng;
use crate::reconcile::Reconcile;
use crate::stop::StopRecord;

fn record(id: &str, arrival: i64) -> StopRecord {
    StopRecord {
        id: id.to_string(),
        arrival,
        departure: arrival + 5,
        location: LatLng::new(0.0, 0.0),
        presents_delivered: 0,
        distance_travelled: None,
        city: None,
        region: None,
        population: None,
        details: None,
    }
}

fn status(timestamp: i64, text: &str) -> Card {
    Card { status: Some(text.to_string()), ..Card::at(timestamp) }
}

fn route() -> Route {
    Route::from_records(vec![record("a", 10), record("b", 30), record("c", 50)])
}

fn stream() -> Stream {
    Stream::from_cards(vec![status(10, "tie"), status(20, "mid"), status(60, "late"), status(70, "last")])
}

fn stamps<'a>(cards: impl IntoIterator<Item = &'a TimelineCard>) -> Vec<i64> {
    cards.into_iter().map(|c| c.timestamp).collect()
}

#[test]
fn raw_card_wins_timestamp_tie() {
    let timeline = Timeline::build(&route(), &stream(), 0);
    let future: Vec<_> = timeline.future().iter().collect();

    assert_eq!(future[0].kind, CardKind::Update);
    assert_eq!(future[1].kind, CardKind::City);
    assert_eq!(future[1].stop.as_ref().unwrap().id, "a");
}

#[test]
fn merge_keeps_leftovers_from_both_sides() {
    let only_stops = Timeline::build(&route(), &Stream::new(), 0);
    assert_eq!(only_stops.len(), 3);

    let trailing_cards = Timeline::build(&route(), &stream(), 0);
    similar_asserts::assert_eq!(stamps(trailing_cards.future()), vec![10, 10, 20, 30, 50, 60, 70]);
}

#[test]
fn partitions_at_now() {
    let timeline = Timeline::build(&route(), &stream(), 30);

    similar_asserts::assert_eq!(stamps(timeline.history()), vec![20, 10, 10]);
    similar_asserts::assert_eq!(stamps(timeline.future()), vec![30, 50, 60, 70]);
    assert_eq!(timeline.len(), route().len() + stream().len());
}

#[test]
fn drain_promotes_elapsed_cards_in_order() {
    let mut timeline = Timeline::build(&route(), &stream(), 0);
    let promoted = timeline.drain(25);

    similar_asserts::assert_eq!(stamps(&promoted), vec![10, 10, 20]);
    similar_asserts::assert_eq!(stamps(timeline.history()), vec![20, 10, 10]);
    assert_eq!(timeline.len(), 7);
}

#[test]
fn drain_is_monotonic() {
    let mut timeline = Timeline::build(&route(), &stream(), 0);
    timeline.drain(55);
    let history_len = timeline.history().len();

    assert!(timeline.drain(40).is_empty());
    assert_eq!(timeline.history().len(), history_len);
    assert!(timeline.future().iter().all(|c| c.timestamp >= 55));
}

#[test]
fn drain_matches_fresh_build() {
    let mut drained = Timeline::build(&route(), &stream(), 0);
    drained.drain(52);
    similar_asserts::assert_eq!(drained, Timeline::build(&route(), &stream(), 52));
}

#[test]
fn rebuild_dirty_when_history_grows() {
    let mut timeline = Timeline::build(&route(), &stream(), 15);
    assert!(!timeline.rebuild(&route(), &stream(), 15, false));
    assert!(timeline.rebuild(&route(), &stream(), 25, false));
}

#[test]
fn rebuild_forced_dirty() {
    let mut timeline = Timeline::build(&route(), &stream(), 15);
    assert!(timeline.rebuild(&route(), &stream(), 15, true));
}

#[test]
fn game_card_resolves_without_status() {
    let card = Card { game: Some("elf".to_string()), ..status(5, "hidden") };
    let entry = TimelineCard::from_card(card);
    assert_eq!(entry.kind, CardKind::Game);
    assert_eq!(entry.card.unwrap().status, None);
}

#[test]
fn stop_card_resolves_only_while_same_stop() {
    let mut route = route();
    let entry = TimelineCard::for_stop(route.get(2).unwrap());
    assert_eq!(entry.resolve_stop(&route).unwrap().id, "c");

    route.apply(2, vec![record("c2", 55)]);
    assert!(entry.resolve_stop(&route).is_none());
}

#[test]
fn serializes_kind_as_type() {
    let entry = TimelineCard::for_stop(route().get(0).unwrap());
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["type"], "city");
    assert_eq!(json["stop"]["id"], "a");
    assert!(json.get("card").is_none());
}
