// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use trek_core::{ClockSource, TimelineCard};

use crate::cli::OutputFormat;
use crate::display::format_card;
use crate::error::Result;
use crate::sync::{SyncEngine, Transport};

use super::{build_engine, load_config, runtime};

/// Entries shown when no limit is given.
pub const DEFAULT_LIMIT: usize = 20;

/// Sync once and print the timeline.
pub fn run(
    config_path: Option<&Path>,
    upcoming: bool,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let config = load_config(config_path)?;
    let engine = build_engine(&config)?;
    let mut out = std::io::stdout().lock();
    runtime()?.block_on(report(&engine, upcoming, limit, format, &mut out))
}

/// Prints history (most recent first) or the upcoming entries (soonest first).
pub(crate) async fn report<T, C, W>(
    engine: &SyncEngine<T, C>,
    upcoming: bool,
    limit: Option<usize>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    T: Transport,
    C: ClockSource,
    W: Write,
{
    engine.sync().await?;
    let timeline = engine.timeline();
    let route = engine.destinations();

    let source = if upcoming { timeline.future() } else { timeline.history() };
    let entries: Vec<&TimelineCard> = source.iter().take(limit.unwrap_or(usize::MAX)).collect();

    match format {
        OutputFormat::Text => {
            if entries.is_empty() {
                let what = if upcoming { "upcoming" } else { "past" };
                writeln!(out, "No {} entries.", what)?;
            }
            for card in entries {
                writeln!(out, "{}", format_card(card, &route))?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod tests;
