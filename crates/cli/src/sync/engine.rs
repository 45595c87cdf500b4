// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The polling session: sync loop plus session state machine.
//!
//! A [`SyncEngine`] owns everything one tracked journey needs: the adjusted
//! clock, the route and card stream, the merged timeline, and the kill
//! switch. It is the only component that talks to the server.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──sync()──► Requesting ──ok──► Applying ──► Idle
//!                       │                │
//!                       └─────error──────┴──► Failed (killed)
//! ```
//!
//! The engine is single-threaded. State lives in `RefCell`s and no borrow
//! is held across an `.await`; events are collected while state is
//! mutated and delivered only after every borrow has been released.
//!
//! At most one request is in flight. A `sync()` issued while another is
//! running does not hit the network; it waits for the running request and
//! receives a copy of its result.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use trek_core::progress::{interpolate, NEAREST_STOP_LIMIT_M};
use trek_core::protocol::{SyncRequest, SyncResponse, STATUS_OK};
use trek_core::{
    Clock, ClockSource, LatLng, Phase, Progress, Reconcile, Route, Splice, StopDetails, Stream,
    SystemClock, Timeline, TimelineCard, Unavailable, UserContext,
};

use super::details::{DetailsCache, DetailsError, Lookup};
use super::events::{dispatch, Event, EventKind, ListenerId, ListenerResult, Listeners};
use super::transport::{Transport, TransportError};

/// Identity the client reports to the server.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Client identifier sent with every request.
    pub client_id: String,
    /// Language for localized content.
    pub language: String,
    /// Running client version, compared against `upgradeToVersion`.
    pub version: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            client_id: "trek".to_string(),
            language: "en".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error type for sync operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SyncError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a status other than OK.
    #[error("server refused sync with status '{0}'")]
    Rejected(String),

    /// The server asked this client to stop polling.
    #[error("switched off by server")]
    SwitchedOff,

    /// The response contradicts what the client already holds.
    #[error("protocol violation: {0}")]
    Protocol(Rc<trek_core::Error>),

    /// The request this call was waiting on went away without an answer.
    #[error("in-flight sync was abandoned")]
    Abandoned,
}

impl From<trek_core::Error> for SyncError {
    fn from(e: trek_core::Error) -> Self {
        SyncError::Protocol(Rc::new(e))
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Where the sync loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Requesting,
    Applying,
    Failed,
    Killed,
}

/// Summary of one applied sync response.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// How long the server wants us to wait before the next poll.
    pub refresh: Duration,
    pub destinations: Splice,
    pub stream: Splice,
    pub fingerprint_changed: bool,
    pub timeline_changed: bool,
    /// The server advertised a newer client version.
    pub reload: bool,
}

type Waiter = oneshot::Sender<SyncResult<SyncReport>>;

struct SessionState {
    phase: SyncPhase,
    fingerprint: String,
    synced: bool,
    killed: bool,
    route: Rc<Route>,
    stream: Rc<Stream>,
    timeline: Timeline,
    client_specific: Rc<Map<String, Value>>,
    user_location: Option<LatLng>,
    user_destination: Option<usize>,
    /// Route index and id of the last upcoming stop announced while in transit.
    announced_next: Option<(usize, String)>,
    details: DetailsCache,
}

impl SessionState {
    fn new() -> Self {
        SessionState {
            phase: SyncPhase::Idle,
            fingerprint: String::new(),
            synced: false,
            killed: false,
            route: Rc::new(Route::new()),
            stream: Rc::new(Stream::new()),
            timeline: Timeline::default(),
            client_specific: Rc::new(Map::new()),
            user_location: None,
            user_destination: None,
            announced_next: None,
            details: DetailsCache::new(),
        }
    }

    fn user_context(&self) -> Option<UserContext> {
        self.user_location
            .map(|location| UserContext { location, destination: self.user_destination })
    }

    fn history(&self) -> Rc<Vec<TimelineCard>> {
        Rc::new(self.timeline.history().iter().cloned().collect())
    }
}

/// Marks a request as in flight until dropped.
///
/// Dropping without [`InFlight::finish`] (the request future was dropped)
/// releases every waiter with [`SyncError::Abandoned`].
struct InFlight<'a> {
    waiters: &'a RefCell<Option<Vec<Waiter>>>,
}

impl InFlight<'_> {
    fn finish(self, result: &SyncResult<SyncReport>) {
        let waiters = self.waiters.borrow_mut().take().unwrap_or_default();
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.waiters.borrow_mut().take();
    }
}

/// One tracked journey kept in sync with the server.
pub struct SyncEngine<T: Transport, C: ClockSource = SystemClock> {
    config: SyncConfig,
    transport: T,
    clock: RefCell<Clock<C>>,
    /// Per-session jitter sent with every request.
    jitter: f64,
    state: RefCell<SessionState>,
    /// `Some` while a request is in flight, holding callers waiting on it.
    in_flight: RefCell<Option<Vec<Waiter>>>,
    listeners: RefCell<Listeners>,
}

impl<T: Transport> SyncEngine<T, SystemClock> {
    /// Creates an engine on the system clock.
    pub fn new(config: SyncConfig, transport: T) -> Self {
        Self::with_clock(config, transport, Clock::new())
    }
}

impl<T: Transport, C: ClockSource> SyncEngine<T, C> {
    /// Creates an engine with a custom clock (for testing or overrides).
    pub fn with_clock(config: SyncConfig, transport: T, clock: Clock<C>) -> Self {
        SyncEngine {
            config,
            transport,
            clock: RefCell::new(clock),
            jitter: rand::random::<f64>(),
            state: RefCell::new(SessionState::new()),
            in_flight: RefCell::new(None),
            listeners: RefCell::new(Listeners::new()),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Adjusted time in ms since the Unix epoch.
    pub fn now(&self) -> i64 {
        self.clock.borrow().now()
    }

    /// Adjusted time as a UTC date.
    pub fn date_now(&self) -> DateTime<Utc> {
        self.clock.borrow().date_now()
    }

    pub fn phase(&self) -> SyncPhase {
        let state = self.state.borrow();
        if state.killed {
            SyncPhase::Killed
        } else {
            state.phase
        }
    }

    pub fn is_synced(&self) -> bool {
        self.state.borrow().synced
    }

    pub fn is_killed(&self) -> bool {
        self.state.borrow().killed
    }

    /// Whether a request is currently in flight.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.borrow().is_some()
    }

    /// Snapshot of the route. Later syncs do not change a held snapshot.
    pub fn destinations(&self) -> Rc<Route> {
        Rc::clone(&self.state.borrow().route)
    }

    /// Snapshot of the raw card stream.
    pub fn stream(&self) -> Rc<Stream> {
        Rc::clone(&self.state.borrow().stream)
    }

    /// The timeline, after promoting every card whose time has come.
    pub fn timeline(&self) -> Timeline {
        self.drain_timeline();
        self.state.borrow().timeline.clone()
    }

    pub fn user_location(&self) -> Option<LatLng> {
        self.state.borrow().user_location
    }

    /// Route index of the stop nearest the user, if one is close enough.
    pub fn user_destination(&self) -> Option<usize> {
        self.state.borrow().user_destination
    }

    pub fn user_in_europe(&self) -> bool {
        self.state.borrow().user_location.is_some_and(|l| l.in_europe())
    }

    /// Opaque per-client switches from the last response.
    pub fn client_specific(&self) -> Rc<Map<String, Value>> {
        Rc::clone(&self.state.borrow().client_specific)
    }

    pub fn fingerprint(&self) -> String {
        self.state.borrow().fingerprint.clone()
    }

    /// Subscribes to one kind of event.
    pub fn add_listener<F>(&self, kind: EventKind, handler: F) -> ListenerId
    where
        F: Fn(&Event) -> ListenerResult + 'static,
    {
        self.listeners.borrow_mut().add(kind, Rc::new(handler))
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }

    fn emit(&self, event: &Event) {
        let handlers = self.listeners.borrow().handlers_for(event.kind());
        dispatch(&handlers, event);
    }

    fn emit_all(&self, events: &[Event]) {
        for event in events {
            self.emit(event);
        }
    }

    /// Stops the session. Raises `kill` only on the first call.
    pub fn kill(&self) {
        let changed = {
            let mut state = self.state.borrow_mut();
            !std::mem::replace(&mut state.killed, true)
        };
        if changed {
            warn!("session killed");
            self.emit(&Event::Kill);
        }
    }

    /// Revives a killed session. Raises `andwereback` only if it was killed.
    pub fn resuscitate(&self) {
        let changed = {
            let mut state = self.state.borrow_mut();
            std::mem::replace(&mut state.killed, false)
        };
        if changed {
            info!("session resuscitated");
            self.emit(&Event::AndWereBack);
        }
    }

    fn build_request(&self) -> SyncRequest {
        let state = self.state.borrow();
        SyncRequest {
            rand: self.jitter,
            client: self.config.client_id.clone(),
            language: self.config.language.clone(),
            route_offset: state.route.len(),
            stream_offset: state.stream.len(),
            fingerprint: state.fingerprint.clone(),
        }
    }

    /// Polls the server once and applies the response.
    ///
    /// If a request is already in flight this waits for it instead and
    /// returns its result. Any failure kills the session.
    pub async fn sync(&self) -> SyncResult<SyncReport> {
        let pending = {
            let mut in_flight = self.in_flight.borrow_mut();
            match in_flight.as_mut() {
                Some(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                None => {
                    *in_flight = Some(Vec::new());
                    None
                }
            }
        };
        if let Some(rx) = pending {
            debug!("sync already in flight, waiting for it");
            return rx.await.unwrap_or(Err(SyncError::Abandoned));
        }

        let guard = InFlight { waiters: &self.in_flight };
        let result = self.request_and_apply().await;
        guard.finish(&result);

        if result.is_ok() {
            self.emit(&Event::Sync);
        }
        result
    }

    async fn request_and_apply(&self) -> SyncResult<SyncReport> {
        let request = self.build_request();
        debug!(
            "sync request: route_offset={} stream_offset={} fingerprint='{}'",
            request.route_offset, request.stream_offset, request.fingerprint
        );
        self.state.borrow_mut().phase = SyncPhase::Requesting;

        let outcome = match self.transport.request(request).await {
            Ok(response) => self.apply(response),
            Err(e) => Err(SyncError::Transport(e)),
        };

        match outcome {
            Ok(report) => {
                self.state.borrow_mut().phase = SyncPhase::Idle;
                Ok(report)
            }
            Err(e) => {
                warn!("sync failed: {}", e);
                self.state.borrow_mut().phase = SyncPhase::Failed;
                self.kill();
                Err(e)
            }
        }
    }

    fn apply(&self, response: SyncResponse) -> SyncResult<SyncReport> {
        if response.status != STATUS_OK {
            return Err(SyncError::Rejected(response.status));
        }
        if response.switch_off {
            return Err(SyncError::SwitchedOff);
        }

        let mut events = Vec::new();
        let report = {
            let mut state = self.state.borrow_mut();
            state.phase = SyncPhase::Applying;
            response.validate(&state.route, &state.stream)?;
            let refresh = response.refresh_interval()?;
            let user_location = response.user_location()?;

            self.clock.borrow_mut().set_offset(response.now, response.time_offset);
            let now = self.clock.borrow().now();

            let reload = response
                .upgrade_to_version
                .as_deref()
                .is_some_and(|v| v > self.config.version.as_str());
            if reload {
                info!("server advertises version {:?}, reload requested", response.upgrade_to_version);
                events.push(Event::Reload);
            }

            let fingerprint_changed = response.fingerprint != state.fingerprint;
            if fingerprint_changed {
                info!("fingerprint changed: '{}' -> '{}'", state.fingerprint, response.fingerprint);
                state.fingerprint = response.fingerprint;
                state.details.clear();
            }
            state.client_specific = Rc::new(response.client_specific);

            let destinations =
                Rc::make_mut(&mut state.route).apply(response.route_offset, response.destinations);
            if !destinations.is_noop() {
                debug!("destinations: cut {} appended {}", destinations.cut, destinations.appended);
                events.push(Event::DestinationsChanged(Rc::clone(&state.route)));
            }

            let stream = Rc::make_mut(&mut state.stream).apply(response.stream_offset, response.stream);
            if !stream.is_noop() {
                debug!("stream: cut {} appended {}", stream.cut, stream.appended);
                events.push(Event::StreamChanged(Rc::clone(&state.stream)));
            }

            if user_location.is_some() {
                state.user_location = user_location;
            }
            let user_destination = state
                .user_location
                .and_then(|l| state.route.nearest_index(&l, NEAREST_STOP_LIMIT_M));
            state.user_destination = user_destination;

            let session = &mut *state;
            let timeline_changed =
                session.timeline.rebuild(&session.route, &session.stream, now, fingerprint_changed);
            if timeline_changed {
                events.push(Event::TimelineChanged(state.history()));
            }

            state.synced = true;
            SyncReport {
                refresh,
                destinations,
                stream,
                fingerprint_changed,
                timeline_changed,
                reload,
            }
        };

        self.emit_all(&events);
        self.resuscitate();
        Ok(report)
    }

    /// Polls forever, sleeping for the server's refresh between polls.
    ///
    /// Returns the error that ended the loop; the session is killed by then.
    pub async fn run(&self) -> SyncError {
        loop {
            match self.sync().await {
                Ok(report) => {
                    debug!("next sync in {:?}", report.refresh);
                    tokio::time::sleep(report.refresh).await;
                }
                Err(e) => return e,
            }
        }
    }

    /// Promotes due cards onto the history and raises their events.
    fn drain_timeline(&self) {
        let now = self.now();
        let events = {
            let mut state = self.state.borrow_mut();
            let promoted = state.timeline.drain(now);
            let mut events = Vec::new();
            if !promoted.is_empty() {
                events.extend(
                    promoted
                        .into_iter()
                        .filter(|card| !card.is_stop())
                        .map(|card| Event::Card(Rc::new(card))),
                );
                events.push(Event::TimelineChanged(state.history()));
            }
            events
        };
        self.emit_all(&events);
    }

    /// Where the journey is right now.
    ///
    /// Before the first successful sync this syncs once and tries again;
    /// if that sync fails the answer is `Unavailable(NotSynced)`.
    pub async fn current_location(&self) -> Progress {
        if !self.is_synced() {
            if let Err(e) = self.sync().await {
                debug!("location requested but sync failed: {}", e);
            }
            if !self.is_synced() {
                return Progress::Unavailable(Unavailable::NotSynced);
            }
        }
        self.location_now()
    }

    /// Journey state at the current adjusted time, without syncing.
    pub fn location_now(&self) -> Progress {
        if !self.is_synced() {
            return Progress::Unavailable(Unavailable::NotSynced);
        }
        self.drain_timeline();

        let now = self.now();
        let (progress, announce) = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            let user = state.user_context();
            let progress = interpolate(&state.route, now, user.as_ref());

            let mut announce = None;
            if let Some(journey) = progress.state().filter(|j| j.phase == Phase::InTransit) {
                if let Some(stop) = state.route.get(journey.next) {
                    let announced = state
                        .announced_next
                        .as_ref()
                        .is_some_and(|(index, id)| *index == journey.next && *id == stop.id);
                    if !announced {
                        state.announced_next = Some((journey.next, stop.id.clone()));
                        announce = Some(Event::Card(Rc::new(TimelineCard::arriving(stop, now))));
                    }
                }
            }
            (progress, announce)
        };

        if let Some(event) = announce {
            self.emit(&event);
        }
        progress
    }

    /// Rich details for the stop at `index`.
    ///
    /// Inline details win, then the cache for the current fingerprint.
    /// Otherwise the details are fetched, at most once per stop every
    /// ten seconds.
    pub async fn stop_details(&self, index: usize) -> Result<StopDetails, DetailsError> {
        let wall = self.clock.borrow().wall_ms();
        let (id, fingerprint) = {
            let mut state = self.state.borrow_mut();
            let stop = state.route.get(index).ok_or(DetailsError::UnknownStop(index))?;
            if let Some(details) = &stop.details {
                return Ok(details.clone());
            }
            let id = stop.id.clone();
            match state.details.begin(&id, wall) {
                Lookup::Cached(details) => return Ok(details),
                Lookup::RateLimited { retry_in_ms } => {
                    return Err(DetailsError::RateLimited { id, retry_in_ms });
                }
                Lookup::Fetch => {}
            }
            (id, state.fingerprint.clone())
        };

        debug!("fetching details for {}", id);
        let details = self.transport.fetch_details(&id, &self.config.language, &fingerprint).await?;

        let mut state = self.state.borrow_mut();
        if state.fingerprint == fingerprint {
            state.details.insert(id, details.clone());
        }
        Ok(details)
    }
}
