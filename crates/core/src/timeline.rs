// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Merged, time-partitioned view of stops and cards.
//!
//! Every stop contributes a `city` card at its arrival time. Those are
//! merged with the raw card stream into one chronological sequence and
//! split at the adjusted `now`:
//!
//! - `history`: cards with `timestamp < now`, most recent first
//! - `future`: cards with `timestamp >= now`, soonest first
//!
//! When a stop card and a raw card compete, the stop card goes first only
//! if its arrival is strictly earlier; on equal timestamps the raw card
//! wins.

use serde::Serialize;
use std::collections::VecDeque;

use crate::card::{Card, CardKind, Stream};
use crate::stop::{Route, Stop};

/// Index-based reference from a timeline card to its stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopRef {
    pub index: usize,
    pub id: String,
}

/// A card placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineCard {
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: CardKind,
    /// Set for cards generated from a stop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopRef>,
    /// Set for cards from the raw stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

impl TimelineCard {
    /// Creates the `city` card for a stop, timed at its arrival.
    pub fn for_stop(stop: &Stop) -> Self {
        Self::arriving(stop, stop.arrival)
    }

    /// Creates a `city` card for a stop at an arbitrary time.
    pub fn arriving(stop: &Stop, timestamp: i64) -> Self {
        TimelineCard {
            timestamp,
            kind: CardKind::City,
            stop: Some(StopRef { index: stop.index(), id: stop.id.clone() }),
            card: None,
        }
    }

    /// Wraps a raw card, resolving its kind.
    pub fn from_card(card: Card) -> Self {
        let card = card.normalized();
        TimelineCard { timestamp: card.timestamp, kind: card.kind(), stop: None, card: Some(card) }
    }

    pub fn is_stop(&self) -> bool {
        self.stop.is_some()
    }

    /// Looks up the backing stop, if it is still the same stop in `route`.
    pub fn resolve_stop<'r>(&self, route: &'r Route) -> Option<&'r Stop> {
        let stop_ref = self.stop.as_ref()?;
        route.get(stop_ref.index).filter(|s| s.id == stop_ref.id)
    }
}

/// Merges stops and cards into one chronological sequence.
fn merge(route: &Route, stream: &Stream) -> Vec<TimelineCard> {
    let mut stops = route.iter().peekable();
    let mut cards = stream.iter().peekable();
    let mut merged = Vec::with_capacity(route.len() + stream.len());

    loop {
        let take_stop = match (stops.peek(), cards.peek()) {
            (None, None) => break,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(stop), Some(card)) => stop.arrival < card.timestamp,
        };
        let next = if take_stop {
            stops.next().map(TimelineCard::for_stop)
        } else {
            cards.next().cloned().map(TimelineCard::from_card)
        };
        merged.extend(next);
    }

    merged
}

/// History and future partitions of the merged timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    history: VecDeque<TimelineCard>,
    future: VecDeque<TimelineCard>,
}

impl Timeline {
    /// Builds a timeline partitioned at `now`.
    pub fn build(route: &Route, stream: &Stream, now: i64) -> Self {
        let mut timeline = Timeline::default();
        for card in merge(route, stream) {
            if card.timestamp < now {
                timeline.history.push_front(card);
            } else {
                timeline.future.push_back(card);
            }
        }
        timeline
    }

    /// Replaces this timeline with a fresh build.
    ///
    /// Returns true ("dirty") if the history length changed or
    /// `force_dirty` is set. Contents are not diffed.
    pub fn rebuild(&mut self, route: &Route, stream: &Stream, now: i64, force_dirty: bool) -> bool {
        let previous_len = self.history.len();
        *self = Timeline::build(route, stream, now);
        force_dirty || self.history.len() != previous_len
    }

    /// Promotes every future card whose time has passed onto the front of
    /// history, returning them in promotion order.
    pub fn drain(&mut self, now: i64) -> Vec<TimelineCard> {
        let mut promoted = Vec::new();
        while self.future.front().is_some_and(|c| c.timestamp < now) {
            if let Some(card) = self.future.pop_front() {
                self.history.push_front(card.clone());
                promoted.push(card);
            }
        }
        promoted
    }

    /// Elapsed cards, most recent first.
    pub fn history(&self) -> &VecDeque<TimelineCard> {
        &self.history
    }

    /// Upcoming cards, soonest first.
    pub fn future(&self) -> &VecDeque<TimelineCard> {
        &self.future
    }

    /// Total number of cards across both partitions.
    pub fn len(&self) -> usize {
        self.history.len() + self.future.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.future.is_empty()
    }
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod tests;
