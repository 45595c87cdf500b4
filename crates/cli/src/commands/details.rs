// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use serde_json::Value;
use trek_core::ClockSource;

use crate::cli::OutputFormat;
use crate::display::format_time;
use crate::error::{Error, Result};
use crate::sync::{SyncEngine, Transport};

use super::{build_engine, load_config, runtime};

/// Sync once and print the details of one stop.
pub fn run(config_path: Option<&Path>, index: usize, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let engine = build_engine(&config)?;
    let mut out = std::io::stdout().lock();
    runtime()?.block_on(report(&engine, index, format, &mut out))
}

pub(crate) async fn report<T, C, W>(
    engine: &SyncEngine<T, C>,
    index: usize,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    T: Transport,
    C: ClockSource,
    W: Write,
{
    engine.sync().await?;
    let route = engine.destinations();
    let stop = route.get(index).ok_or(Error::StopNotFound { index, len: route.len() })?;
    let details = engine.stop_details(index).await?;

    match format {
        OutputFormat::Text => {
            writeln!(out, "{} ({})", stop.name(), stop.id)?;
            writeln!(out, "  arrival:    {}", format_time(stop.arrival))?;
            writeln!(out, "  departure:  {}", format_time(stop.departure))?;
            for (key, value) in &details.0 {
                match value {
                    Value::String(s) => writeln!(out, "  {}: {}", key, s)?,
                    other => writeln!(out, "  {}: {}", key, other)?,
                }
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&details)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "details_tests.rs"]
mod tests;
