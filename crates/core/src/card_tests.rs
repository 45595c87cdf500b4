// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn card(json: &str) -> Card {
    serde_json::from_str(json).unwrap()
}

#[parameterized(
    game = { r#"{"timestamp":1,"game":"elf","status":"hi","youtubeId":"x"}"#, CardKind::Game },
    video = { r#"{"timestamp":1,"youtubeId":"x","imageUrl":"y"}"#, CardKind::Video },
    photo = { r#"{"timestamp":1,"imageUrl":"y","status":"hi"}"#, CardKind::Photo },
    update = { r#"{"timestamp":1,"status":"hi","didyouknow":"fact"}"#, CardKind::Update },
    facts = { r#"{"timestamp":1,"didyouknow":"fact"}"#, CardKind::Facts },
    plain = { r#"{"timestamp":1}"#, CardKind::Plain },
)]
fn kind_precedence(json: &str, expected: CardKind) {
    assert_eq!(card(json).kind(), expected);
}

#[test]
fn game_clears_status() {
    let normalized = card(r#"{"timestamp":1,"game":"elf","status":"hi"}"#).normalized();
    assert_eq!(normalized.status, None);
    assert_eq!(normalized.game.as_deref(), Some("elf"));
}

#[test]
fn status_kept_without_game() {
    let normalized = card(r#"{"timestamp":1,"status":"hi"}"#).normalized();
    assert_eq!(normalized.status.as_deref(), Some("hi"));
}

#[test]
fn did_you_know_uses_wire_name() {
    let mut c = Card::at(3);
    c.did_you_know = Some("fact".to_string());
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["didyouknow"], "fact");
    assert!(json.get("youtubeId").is_none());
}

#[parameterized(
    city = { CardKind::City, "city" },
    game = { CardKind::Game, "game" },
    plain = { CardKind::Plain, "plain" },
)]
fn kind_display(kind: CardKind, expected: &str) {
    assert_eq!(kind.to_string(), expected);
    assert_eq!(serde_json::to_value(kind).unwrap(), expected);
}

#[test]
fn stream_accessors() {
    let stream = Stream::from_cards(vec![Card::at(1), Card::at(2)]);
    assert_eq!(stream.len(), 2);
    assert_eq!(stream.last().unwrap().timestamp, 2);
    assert_eq!((&stream).into_iter().count(), 2);
    assert!(Stream::new().is_empty());
}
