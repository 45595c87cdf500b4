// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed publish/subscribe for session events.
//!
//! Listeners subscribe to one [`EventKind`] and receive every [`Event`] of
//! that kind in registration order. A listener that returns an error is
//! logged and skipped; delivery to the remaining listeners continues.

use std::fmt;
use std::rc::Rc;

use tracing::warn;
use trek_core::{Route, Stream, TimelineCard};

/// The fixed set of events a session can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Sync,
    DestinationsChanged,
    StreamChanged,
    TimelineChanged,
    Card,
    Kill,
    AndWereBack,
    Reload,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::Sync,
        EventKind::DestinationsChanged,
        EventKind::StreamChanged,
        EventKind::TimelineChanged,
        EventKind::Card,
        EventKind::Kill,
        EventKind::AndWereBack,
        EventKind::Reload,
    ];

    /// Wire name of the event, as listeners outside Rust know it.
    pub fn as_event_name(&self) -> &'static str {
        match self {
            EventKind::Sync => "sync",
            EventKind::DestinationsChanged => "destinations_changed",
            EventKind::StreamChanged => "stream_changed",
            EventKind::TimelineChanged => "timeline_changed",
            EventKind::Card => "card",
            EventKind::Kill => "kill",
            EventKind::AndWereBack => "andwereback",
            EventKind::Reload => "reload",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_event_name())
    }
}

/// An event together with its payload.
#[derive(Debug, Clone)]
pub enum Event {
    Sync,
    /// Snapshot of the route after a batch was applied.
    DestinationsChanged(Rc<Route>),
    /// Snapshot of the stream after a batch was applied.
    StreamChanged(Rc<Stream>),
    /// The history partition, most recent first.
    TimelineChanged(Rc<Vec<TimelineCard>>),
    /// A single card that just became current.
    Card(Rc<TimelineCard>),
    Kill,
    AndWereBack,
    Reload,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Sync => EventKind::Sync,
            Event::DestinationsChanged(_) => EventKind::DestinationsChanged,
            Event::StreamChanged(_) => EventKind::StreamChanged,
            Event::TimelineChanged(_) => EventKind::TimelineChanged,
            Event::Card(_) => EventKind::Card,
            Event::Kill => EventKind::Kill,
            Event::AndWereBack => EventKind::AndWereBack,
            Event::Reload => EventKind::Reload,
        }
    }
}

/// Outcome of a single listener invocation.
pub type ListenerResult = Result<(), Box<dyn std::error::Error>>;

/// A registered event handler.
pub type Handler = Rc<dyn Fn(&Event) -> ListenerResult>;

/// Handle returned by registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of event handlers, in registration order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, EventKind, Handler)>,
}

impl Listeners {
    pub fn new() -> Self {
        Listeners::default()
    }

    /// Subscribes `handler` to events of `kind`.
    pub fn add(&mut self, kind: EventKind, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, kind, handler));
        id
    }

    /// Unsubscribes a handler. Returns false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _, _)| *entry != id);
        self.entries.len() != before
    }

    /// Snapshot of the handlers subscribed to `kind`.
    ///
    /// The registry itself is not borrowed while the snapshot is used, so
    /// handlers may register or remove listeners.
    pub fn handlers_for(&self, kind: EventKind) -> Vec<Handler> {
        self.entries
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Delivers `event` to each handler in order and returns how many failed.
pub fn dispatch(handlers: &[Handler], event: &Event) -> usize {
    let mut failed = 0;
    for handler in handlers {
        if let Err(e) = handler(event) {
            warn!("{} listener failed: {}", event.kind(), e);
            failed += 1;
        }
    }
    failed
}
