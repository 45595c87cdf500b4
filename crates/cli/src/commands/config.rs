// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use crate::cli::{ConfigCommand, OutputFormat};
use crate::config::{resolve_path, Config};
use crate::error::{Error, Result};

use super::load_config;

/// Execute a config subcommand.
pub fn run(config_path: Option<&Path>, cmd: ConfigCommand) -> Result<()> {
    let mut out = std::io::stdout().lock();
    match cmd {
        ConfigCommand::Show { output } => {
            let config = load_config(config_path)?;
            run_show(&config, output.output, &mut out)
        }
        ConfigCommand::Init { endpoint, force } => {
            let path = resolve_path(config_path);
            run_init(&path, endpoint, force, &mut out)
        }
        ConfigCommand::Path => {
            writeln!(out, "{}", resolve_path(config_path).display())?;
            Ok(())
        }
    }
}

/// Print the effective configuration.
pub(crate) fn run_show<W: Write>(config: &Config, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let content = toml::to_string_pretty(config)
                .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
            write!(out, "{}", content)?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
        }
    }
    Ok(())
}

/// Write a default config file at `path`.
pub(crate) fn run_init<W: Write>(
    path: &Path,
    endpoint: Option<String>,
    force: bool,
    out: &mut W,
) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::ConfigExists(path.display().to_string()));
    }
    let mut config = Config::default();
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }
    config.validate()?;
    config.save(path)?;
    writeln!(out, "Wrote {}", path.display())?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
