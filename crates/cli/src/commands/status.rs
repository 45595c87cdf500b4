// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use trek_core::ClockSource;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{SyncEngine, Transport};

use super::{build_engine, load_config, runtime, write_progress};

/// Sync once and print the journey state.
pub fn run(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let engine = build_engine(&config)?;
    let mut out = std::io::stdout().lock();
    runtime()?.block_on(report(&engine, format, &mut out))
}

pub(crate) async fn report<T, C, W>(
    engine: &SyncEngine<T, C>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    T: Transport,
    C: ClockSource,
    W: Write,
{
    let outcome = engine.sync().await?;
    if outcome.reload && format == OutputFormat::Text {
        eprintln!("note: the server advertises a newer client version");
    }
    let progress = engine.location_now();
    write_progress(engine, &progress, format, out)
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
