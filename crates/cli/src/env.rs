// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `TREK_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    std::env::var(vars::TREK_CONFIG).ok().map(PathBuf::from)
}

/// Returns the value of `TREK_ENDPOINT` if set and non-empty.
pub fn endpoint() -> Option<String> {
    std::env::var(vars::TREK_ENDPOINT).ok().filter(|v| !v.is_empty())
}

/// Returns the raw value of `TREK_TIMESTAMP_OVERRIDE` if set.
///
/// Parsing happens in the config layer so a bad value can be reported.
pub fn timestamp_override() -> Option<String> {
    std::env::var(vars::TREK_TIMESTAMP_OVERRIDE).ok().filter(|v| !v.is_empty())
}

/// Returns the log filter directive from `TREK_LOG` if set.
pub fn log_filter() -> Option<String> {
    std::env::var(vars::TREK_LOG).ok()
}

/// Returns `true` if `NO_COLOR=1`.
pub fn no_color() -> bool {
    std::env::var(vars::NO_COLOR).is_ok_and(|v| v == "1")
}

/// Returns `true` if `COLOR=1`.
pub fn force_color() -> bool {
    std::env::var(vars::COLOR).is_ok_and(|v| v == "1")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
