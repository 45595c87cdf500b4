// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! trek-core: Journey model and reconciliation primitives for trek.
//!
//! This crate holds the synchronous half of the tracker: adjusted time,
//! the stop and card sequences received from the server, the merged
//! timeline, and position interpolation between stops. The async session
//! that talks to the server lives in the `trek` crate.

pub mod card;
pub mod clock;
pub mod error;
pub mod geo;
pub mod progress;
pub mod protocol;
pub mod reconcile;
pub mod stop;
pub mod timeline;

pub use card::{Card, CardKind, Stream};
pub use clock::{Clock, ClockSource, SystemClock};
pub use error::{Error, Result};
pub use geo::LatLng;
pub use progress::{JourneyState, Phase, Progress, Unavailable, UserContext};
pub use protocol::{SyncRequest, SyncResponse};
pub use reconcile::{Reconcile, Splice};
pub use stop::{Route, Stop, StopDetails, StopRecord};
pub use timeline::{StopRef, Timeline, TimelineCard};
