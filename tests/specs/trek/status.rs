// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Commands that talk to a server, run against an unreachable endpoint.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

/// Nothing listens on the discard port of localhost in the test sandbox.
const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

fn trek(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("trek");
    cmd.env("TREK_CONFIG", temp.path().join("trek.toml"))
        .env("TREK_ENDPOINT", DEAD_ENDPOINT)
        .env("TREK_LOG", "off")
        .env("NO_COLOR", "1");
    cmd
}

#[parameterized(
    status = { &["status"] },
    status_json = { &["status", "-o", "json"] },
    timeline = { &["timeline"] },
    details = { &["details", "0"] },
    watch = { &["watch"] },
)]
fn unreachable_server_fails_cleanly(args: &[&str]) {
    let temp = TempDir::new().unwrap();
    trek(&temp)
        .args(args)
        .timeout(std::time::Duration::from_secs(60))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("error: sync failed: transport error"));
}
