// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration is stored in `trek.toml` under the user config directory
//! (or wherever `TREK_CONFIG` / `--config` points) and includes:
//! - `endpoint`: base URL of the journey server
//! - `client_id`, `language`, `version`: identity reported on every sync
//! - `timestamp_override`: pin adjusted time for debugging a replay
//!
//! `TREK_ENDPOINT` and `TREK_TIMESTAMP_OVERRIDE` win over the file.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::env;
use crate::error::{Error, Result};
use crate::sync::SyncConfig;

const CONFIG_DIR_NAME: &str = "trek";
const CONFIG_FILE_NAME: &str = "trek.toml";

/// Client configuration stored in `trek.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the journey server.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Identifier sent with every request.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Language for localized content.
    #[serde(default = "default_language")]
    pub language: String,
    /// Client version compared against the server's upgrade hint.
    #[serde(default = "default_version")]
    pub version: String,
    /// Fixed adjusted time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_override: Option<i64>,
}

fn default_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_client_id() -> String {
    "trek".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: default_endpoint(),
            client_id: default_client_id(),
            language: default_language(),
            version: default_version(),
            timestamp_override: None,
        }
    }
}

impl Config {
    /// Loads configuration from the given file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Config::load(path) {
            Err(Error::ConfigNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to the given file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Applies `TREK_ENDPOINT` and `TREK_TIMESTAMP_OVERRIDE`.
    pub fn apply_env(self) -> Result<Self> {
        self.with_overrides(env::endpoint(), env::timestamp_override().as_deref())
    }

    /// Applies explicit overrides on top of the file values.
    pub fn with_overrides(mut self, endpoint: Option<String>, timestamp: Option<&str>) -> Result<Self> {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(raw) = timestamp {
            self.timestamp_override = Some(parse_timestamp(raw)?);
        }
        self.validate()?;
        Ok(self)
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(Error::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(())
    }

    /// The identity the sync engine reports.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            client_id: self.client_id.clone(),
            language: self.language.clone(),
            version: self.version.clone(),
        }
    }
}

/// Resolve the config file path.
///
/// Precedence: explicit `--config`, then `TREK_CONFIG`, then the user
/// config directory.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = env::config_path() {
        return path;
    }
    default_path()
}

/// `<config dir>/trek/trek.toml`, or `trek.toml` when there is no config dir.
pub fn default_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    }
}

/// Parse a timestamp given as epoch milliseconds or RFC 3339.
pub fn parse_timestamp(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if let Ok(ms) = raw.parse::<i64>() {
        return Ok(ms);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.timestamp_millis())
        .map_err(|_| Error::InvalidTimestamp {
            reason: format!("'{}' is not a timestamp", raw),
        })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
