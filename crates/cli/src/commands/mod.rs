// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod config;
pub mod details;
pub mod status;
pub mod timeline;
pub mod watch;

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use trek_core::{Clock, ClockSource, Progress};

use crate::cli::OutputFormat;
use crate::config::{resolve_path, Config};
use crate::display::format_progress;
use crate::error::Result;
use crate::sync::{HttpTransport, SyncEngine, Transport};

/// The engine the commands drive against a real server.
pub type Engine = SyncEngine<HttpTransport>;

/// Load the config file (defaults if absent) with environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    Config::load_or_default(&resolve_path(explicit))?.apply_env()
}

/// Build an engine for the configured server and clock override.
pub fn build_engine(config: &Config) -> Result<Engine> {
    let transport = HttpTransport::new(config.endpoint.clone())?;
    let mut clock = Clock::new();
    if let Some(ts) = config.timestamp_override {
        clock = clock.with_override(ts);
    }
    Ok(SyncEngine::with_clock(config.sync_config(), transport, clock))
}

/// Single-threaded runtime; the engine is not `Send`.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_all().build()?)
}

/// JSON shape of a progress report.
#[derive(Serialize)]
struct ProgressReport<'a> {
    now: i64,
    fingerprint: String,
    #[serde(flatten)]
    progress: &'a Progress,
}

/// Write one progress report in the requested format.
pub fn write_progress<T, C, W>(
    engine: &SyncEngine<T, C>,
    progress: &Progress,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    T: Transport,
    C: ClockSource,
    W: Write,
{
    let now = engine.now();
    match format {
        OutputFormat::Text => {
            for line in format_progress(progress, &engine.destinations(), now) {
                writeln!(out, "{}", line)?;
            }
        }
        OutputFormat::Json => {
            let report = ProgressReport { now, fingerprint: engine.fingerprint(), progress };
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
