// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use crate::colors;
use crate::help;
use clap::{Parser, Subcommand, ValueEnum};

pub use args::{LimitArgs, OutputArgs};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "trek")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(about = "Follow a live journey from the command line")]
#[command(
    long_about = "Follow a live journey from the command line.\n\n\
    trek polls a journey server, keeps the route and card stream in sync, \
    and reports where the traveller is between stops."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
#[command(arg_required_else_help = true)]
// Allow the unit type field pattern which is required for clap's ArgAction::Version/Help
#[allow(clippy::manual_non_exhaustive)]
pub struct Cli {
    /// Use this config file instead of the default
    #[arg(short = 'c', long = "config", global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Log sync round-trips
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', short_alias = 'V', long = "version", action = clap::ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sync once and print where the journey is
    #[command(after_help = colors::examples("\
Examples:
  trek status                  Human readable summary
  trek status -o json          Journey state as JSON"))]
    Status {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Keep polling and print the journey as it moves
    #[command(after_help = colors::examples("\
Examples:
  trek watch                   Print the state every 5 seconds
  trek watch --every 1         Print the state every second
  trek watch -o json           One JSON object per line"))]
    Watch {
        /// Seconds between printed updates (polling follows the server)
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
        every: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the merged stop and card timeline
    #[command(after_help = colors::examples("\
Examples:
  trek timeline                Last 20 entries that have happened
  trek timeline --upcoming     Entries still in the future
  trek timeline --no-limit     Every entry"))]
    Timeline {
        /// Show upcoming entries instead of history
        #[arg(long)]
        upcoming: bool,

        #[command(flatten)]
        limit: LimitArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Fetch extra details for one stop
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  trek details <index>         Details for the stop at <index>
  trek details 3 -o json       Raw details as JSON")
    )]
    Details {
        /// Position of the stop in the route
        index: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show or create the client configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Configuration management commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration, overrides applied
    #[command(after_help = colors::examples("\
Examples:
  trek config show             Effective settings as TOML
  trek config show -o json     Effective settings as JSON"))]
    Show {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Write a config file with default settings
    #[command(after_help = colors::examples("\
Examples:
  trek config init                              Write defaults
  trek config init --endpoint <url>             Point at a server
  trek -c ./trek.toml config init --force       Overwrite a local file"))]
    Init {
        /// Server base URL to store
        #[arg(long)]
        endpoint: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file path
    Path,
}
