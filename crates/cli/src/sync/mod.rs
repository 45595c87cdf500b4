// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Polling sync with the journey server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Engine    │────►│  Transport  │────►│   Journey   │
//! │(SyncEngine) │◄────│   (trait)   │◄────│   Server    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  Listeners  │  (typed events)
//! └─────────────┘
//! ```
//!
//! # Features
//!
//! - Server-dictated poll interval
//! - Clock skew correction from every response
//! - Cut-point reconciliation of stops and cards
//! - Kill switch with automatic recovery on the next good sync
//! - Injectable transport and clock for testing

mod details;
mod engine;
mod events;
mod transport;

pub use details::{DetailsCache, DetailsError, Lookup, DETAILS_RATE_LIMIT_MS};
pub use engine::{SyncConfig, SyncEngine, SyncError, SyncPhase, SyncReport, SyncResult};
pub use events::{Event, EventKind, Handler, ListenerId, ListenerResult, Listeners};
pub use transport::{HttpTransport, Transport, TransportError, TransportFuture, TransportResult};

#[cfg(test)]
pub(crate) mod test_helpers;
