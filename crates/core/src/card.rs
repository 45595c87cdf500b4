// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Content cards and the stream that holds them.
//!
//! A card's kind is not sent explicitly; it is chosen by which content
//! field is present, in this order:
//!
//! 1. `game` (also clears any `status`)
//! 2. `youtubeId` → video
//! 3. `imageUrl` → photo
//! 4. `status` → update
//! 5. `didyouknow` → facts
//!
//! Cards generated for stops are always `city`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reconcile::Reconcile;

/// The presentation kind of a timeline card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    City,
    Video,
    Photo,
    Update,
    Facts,
    Game,
    /// No recognised content field.
    Plain,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::City => "city",
            CardKind::Video => "video",
            CardKind::Photo => "photo",
            CardKind::Update => "update",
            CardKind::Facts => "facts",
            CardKind::Game => "game",
            CardKind::Plain => "plain",
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content card as sent by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "didyouknow", default, skip_serializing_if = "Option::is_none")]
    pub did_you_know: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
}

impl Card {
    /// Creates an empty card at `timestamp`.
    pub fn at(timestamp: i64) -> Self {
        Card { timestamp, ..Card::default() }
    }

    /// Applies the presentation rules: a game trumps a status update.
    pub fn normalized(mut self) -> Self {
        if self.game.is_some() {
            self.status = None;
        }
        self
    }

    /// Resolves the card kind from its content fields.
    pub fn kind(&self) -> CardKind {
        if self.game.is_some() {
            CardKind::Game
        } else if self.youtube_id.is_some() {
            CardKind::Video
        } else if self.image_url.is_some() {
            CardKind::Photo
        } else if self.status.is_some() {
            CardKind::Update
        } else if self.did_you_know.is_some() {
            CardKind::Facts
        } else {
            CardKind::Plain
        }
    }
}

/// Ordered sequence of cards, by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Stream {
    cards: Vec<Card>,
}

impl Stream {
    pub fn new() -> Self {
        Stream::default()
    }

    /// Builds a stream from raw cards, as if applied at index 0.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut stream = Stream::new();
        stream.apply(0, cards);
        stream
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn last(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }
}

impl Reconcile for Stream {
    type Incoming = Card;

    const COLLECTION: &'static str = "stream";

    fn reconciled_len(&self) -> usize {
        self.cards.len()
    }

    fn truncate_to(&mut self, len: usize) {
        self.cards.truncate(len);
    }

    fn append_one(&mut self, item: Card) {
        self.cards.push(item);
    }
}

impl<'a> IntoIterator for &'a Stream {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
#[path = "card_tests.rs"]
mod tests;
