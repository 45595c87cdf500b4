// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::text;
use tempfile::TempDir;

#[test]
fn test_init_writes_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trek").join("trek.toml");

    let mut out = Vec::new();
    run_init(&path, None, false, &mut out).unwrap();

    assert!(text(&out).starts_with("Wrote "));
    assert_eq!(Config::load(&path).unwrap(), Config::default());
}

#[test]
fn test_init_with_endpoint() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trek.toml");

    let mut out = Vec::new();
    run_init(&path, Some("https://journey.example".to_string()), false, &mut out).unwrap();

    assert_eq!(Config::load(&path).unwrap().endpoint, "https://journey.example");
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trek.toml");
    std::fs::write(&path, "language = \"fr\"\n").unwrap();

    let mut out = Vec::new();
    let err = run_init(&path, None, false, &mut out).unwrap_err();

    assert!(matches!(err, Error::ConfigExists(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "language = \"fr\"\n");
}

#[test]
fn test_init_force_overwrites() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trek.toml");
    std::fs::write(&path, "language = \"fr\"\n").unwrap();

    let mut out = Vec::new();
    run_init(&path, None, true, &mut out).unwrap();

    assert_eq!(Config::load(&path).unwrap().language, "en");
}

#[test]
fn test_init_rejects_bad_endpoint() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trek.toml");

    let mut out = Vec::new();
    let err = run_init(&path, Some("journey.example".to_string()), false, &mut out).unwrap_err();

    assert!(matches!(err, Error::InvalidEndpoint(_)));
    assert!(!path.exists());
}

#[test]
fn test_show_text_is_toml() {
    let mut out = Vec::new();
    run_show(&Config::default(), OutputFormat::Text, &mut out).unwrap();

    let parsed: Config = toml::from_str(&text(&out)).unwrap();
    assert_eq!(parsed, Config::default());
}

#[test]
fn test_show_json() {
    let config = Config { timestamp_override: Some(99), ..Config::default() };
    let mut out = Vec::new();
    run_show(&config, OutputFormat::Json, &mut out).unwrap();

    let value: serde_json::Value = serde_json::from_str(&text(&out)).unwrap();
    assert_eq!(value["endpoint"], "http://localhost:8080");
    assert_eq!(value["timestamp_override"], 99);
}
