//! End-to-end tests of the `medrule` binary.
//!
//! Each test works in its own temporary project directory.

use std::path::Path;
use std::process::{Command, Output};

fn medrule(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_medrule"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run medrule binary")
}

#[test]
fn init_creates_config_and_sample_kb() {
    let dir = tempfile::tempdir().unwrap();
    let out = medrule(dir.path(), &["init"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    assert!(dir.path().join("medrule.toml").exists());
    assert!(dir.path().join("kb.json").exists());

    let config = std::fs::read_to_string(dir.path().join("medrule.toml")).unwrap();
    assert!(config.contains("[learner]"));
    assert!(config.contains("[files]"));
}

#[test]
fn learn_then_diagnose() {
    let dir = tempfile::tempdir().unwrap();
    assert!(medrule(dir.path(), &["init"]).status.success());

    let out = medrule(dir.path(), &["learn"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let rules: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("rules.json")).unwrap()).unwrap();
    assert!(!rules.as_array().unwrap().is_empty());

    let out = medrule(dir.path(), &["diagnose", "--json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let diagnoses: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let ids: Vec<&str> = diagnoses
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["patient"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["P7", "P8"]);
}

#[test]
fn diagnose_single_patient() {
    let dir = tempfile::tempdir().unwrap();
    assert!(medrule(dir.path(), &["init"]).status.success());
    assert!(medrule(dir.path(), &["learn"]).status.success());

    let out = medrule(dir.path(), &["diagnose", "--patient", "P1", "--json"]);
    assert!(out.status.success());
    let diagnoses: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(diagnoses[0]["patient"], "P1");
    // Training patients are covered by the rules learned from them
    let inferred = diagnoses[0]["inferred"].as_array().unwrap();
    assert!(inferred.contains(&serde_json::Value::from("Flu")));

    let out = medrule(dir.path(), &["diagnose", "--patient", "Nobody"]);
    assert!(!out.status.success());
}

#[test]
fn inspect_reports_catalogues() {
    let dir = tempfile::tempdir().unwrap();
    assert!(medrule(dir.path(), &["init"]).status.success());

    let out = medrule(dir.path(), &["inspect"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Patients"));
    assert!(stdout.contains("Measles"));
}

#[test]
fn learn_without_knowledge_base_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = medrule(dir.path(), &["learn", "--kb", "missing.json"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing.json"));
}
