// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help and argument error tests for the `trek` binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use yare::parameterized;

fn trek() -> Command {
    let mut cmd = cargo_bin_cmd!("trek");
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands() {
    trek()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("Journey:"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("Get started:"));
}

#[test]
fn no_arguments_shows_help() {
    trek()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_without_tty_has_no_escape_codes() {
    let output = trek().arg("--help").output().unwrap();
    assert!(!String::from_utf8_lossy(&output.stdout).contains('\x1b'));
}

#[test]
fn version_flag() {
    trek()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[parameterized(
    status = { "status" },
    watch = { "watch" },
    timeline = { "timeline" },
    details = { "details" },
    config = { "config" },
)]
fn command_supports_help_flag(command: &str) {
    trek()
        .args([command, "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[parameterized(
    status = { "status", "trek status -o json" },
    watch = { "watch", "trek watch --every 1" },
    timeline = { "timeline", "trek timeline --upcoming" },
)]
fn command_help_shows_examples(command: &str, example: &str) {
    trek()
        .args([command, "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Examples:"))
        .stdout(predicate::str::contains(example));
}

#[test]
fn unknown_output_format_fails() {
    trek()
        .args(["status", "-o", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("yaml"));
}
