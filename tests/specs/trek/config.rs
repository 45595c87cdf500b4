// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `trek config` tests: init, show and path against a temp config file.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;
use yare::parameterized;

fn trek(config: &PathBuf) -> Command {
    let mut cmd = cargo_bin_cmd!("trek");
    cmd.env("TREK_CONFIG", config)
        .env_remove("TREK_ENDPOINT")
        .env_remove("TREK_TIMESTAMP_OVERRIDE")
        .env("NO_COLOR", "1");
    cmd
}

fn temp_config() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trek.toml");
    (temp, path)
}

#[test]
fn config_path_follows_env() {
    let (_temp, path) = temp_config();
    trek(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(format!("{}\n", path.display()));
}

#[test]
fn config_path_flag_beats_env() {
    let (temp, path) = temp_config();
    let explicit = temp.path().join("other.toml");
    trek(&path)
        .arg("--config")
        .arg(&explicit)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("other.toml"));
}

#[test]
fn config_init_creates_file() {
    let (_temp, path) = temp_config();
    trek(&path)
        .args(["config", "init", "--endpoint", "https://journey.example"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Wrote "));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("endpoint = \"https://journey.example\""));
}

#[test]
fn config_init_twice_needs_force() {
    let (_temp, path) = temp_config();
    trek(&path).args(["config", "init"]).assert().success();

    trek(&path)
        .args(["config", "init"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config already exists"))
        .stderr(predicate::str::contains("--force"));

    trek(&path).args(["config", "init", "--force"]).assert().success();
}

#[test]
fn config_show_without_file_prints_defaults() {
    let (_temp, path) = temp_config();
    trek(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("endpoint = \"http://localhost:8080\""))
        .stdout(predicate::str::contains("language = \"en\""));
}

#[test]
fn config_show_applies_env_overrides() {
    let (_temp, path) = temp_config();
    let output = trek(&path)
        .env("TREK_ENDPOINT", "https://override.example")
        .env("TREK_TIMESTAMP_OVERRIDE", "2026-12-24T00:00:00Z")
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["endpoint"], "https://override.example");
    assert_eq!(value["timestamp_override"], 1_798_070_400_000_i64);
}

#[parameterized(
    bad_toml = { "endpoint = [" , "failed to parse config" },
    bad_endpoint = { "endpoint = \"ftp://x\"", "invalid endpoint" },
)]
fn config_show_reports_bad_file(content: &str, message: &str) {
    let (_temp, path) = temp_config();
    std::fs::write(&path, content).unwrap();
    trek(&path)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: "))
        .stderr(predicate::str::contains(message));
}

#[test]
fn bad_timestamp_override_is_reported() {
    let (_temp, path) = temp_config();
    trek(&path)
        .env("TREK_TIMESTAMP_OVERRIDE", "yesterday")
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid timestamp"));
}
