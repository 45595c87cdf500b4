// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! trekrs - Follow a live journey from the command line.
//!
//! This crate provides the session half of trek: the polling
//! [`SyncEngine`](sync::SyncEngine) that keeps a route and card stream in
//! step with the journey server, plus the `trek` CLI built on it. The pure
//! journey model lives in `trek-core`.
//!
//! # Main Components
//!
//! - [`sync`] - Transport, typed events and the sync engine
//! - [`Config`] - Client configuration (endpoint, identity, time override)
//! - [`Error`] - Error types for all CLI operations
//!
//! # Embedding the engine
//!
//! ```rust,ignore
//! use trekrs::sync::{EventKind, HttpTransport, SyncConfig, SyncEngine};
//!
//! let transport = HttpTransport::new("https://journey.example")?;
//! let engine = SyncEngine::new(SyncConfig::default(), transport);
//! engine.add_listener(EventKind::Card, |event| {
//!     println!("{:?}", event);
//!     Ok(())
//! });
//! let progress = engine.current_location().await;
//! ```

mod cli;
pub mod colors;
mod commands;
mod display;
pub mod env;
pub mod help;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, ConfigCommand, LimitArgs, OutputArgs, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};

/// Install the stderr log subscriber.
///
/// `TREK_LOG` takes an `EnvFilter` directive; without it the level is
/// `info`, or `debug` with `--verbose`.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "info" };
    let filter = env::log_filter()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Status { output } => commands::status::run(config_path, output.output),
        Command::Watch { every, output } => commands::watch::run(config_path, every, output.output),
        Command::Timeline { upcoming, limit, output } => commands::timeline::run(
            config_path,
            upcoming,
            limit.effective(commands::timeline::DEFAULT_LIMIT),
            output.output,
        ),
        Command::Details { index, output } => {
            commands::details::run(config_path, index, output.output)
        }
        Command::Config(cmd) => commands::config::run(config_path, cmd),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
