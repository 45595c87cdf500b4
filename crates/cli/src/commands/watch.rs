// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `trek watch`: poll until the server stops us, printing as we go.

use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use tracing::info;
use trek_core::{ClockSource, TimelineCard};

use crate::cli::OutputFormat;
use crate::display::format_card;
use crate::error::Result;
use crate::sync::{Event, EventKind, SyncEngine, SyncError, Transport};

use super::{build_engine, load_config, runtime, write_progress};

/// Follow the journey, printing state every `every_secs` seconds.
pub fn run(config_path: Option<&Path>, every_secs: u64, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let engine = build_engine(&config)?;
    let mut out = std::io::stdout().lock();
    runtime()?.block_on(watch(&engine, Duration::from_secs(every_secs), format, &mut out))
}

/// Runs the sync loop and a print ticker side by side.
///
/// Returns `Ok` when the server switches tracking off and the loop's error
/// otherwise.
pub(crate) async fn watch<T, C, W>(
    engine: &SyncEngine<T, C>,
    every: Duration,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    T: Transport,
    C: ClockSource,
    W: Write,
{
    let cards: Rc<RefCell<Vec<TimelineCard>>> = Rc::default();
    let listener = {
        let cards = Rc::clone(&cards);
        engine.add_listener(EventKind::Card, move |event| {
            if let Event::Card(card) = event {
                cards.borrow_mut().push(TimelineCard::clone(card));
            }
            Ok(())
        })
    };

    let poll = engine.run();
    tokio::pin!(poll);
    let mut ticker = tokio::time::interval(every);

    let result = loop {
        tokio::select! {
            err = &mut poll => break err,
            _ = ticker.tick() => {
                if !engine.is_synced() {
                    continue;
                }
                let progress = engine.location_now();
                if format == OutputFormat::Text {
                    let route = engine.destinations();
                    for card in cards.borrow_mut().drain(..) {
                        writeln!(out, "{}", format_card(&card, &route))?;
                    }
                }
                write_progress(engine, &progress, format, out)?;
                out.flush()?;
            }
        }
    };
    engine.remove_listener(listener);

    match result {
        SyncError::SwitchedOff => {
            info!("tracking switched off by server");
            if format == OutputFormat::Text {
                writeln!(out, "tracking switched off by the server")?;
            }
            Ok(())
        }
        other => Err(other.into()),
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
