//! Integration tests for the rw-cli binary commands.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Create a temp directory with a small hand-written scenario.
fn test_scenario() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("scenario.json"),
        r#"{
    "name": "Test Range",
    "reference": {
        "origin": [10, 0, 0],
        "primary_target": [800, 0, 0],
        "secondary_target": [-80, 0, 0],
        "bearing": 1000
    },
    "actors": [
        {
            "name": "Hind",
            "mode": 1,
            "flags": "ATTRACTION_ACTIVE | RELOAD_PATH",
            "altitude": { "current": 0, "target": 40 },
            "timers": { "fire": 3 },
            "path_asset": "route.bin",
            "turret": { "aim": 64 }
        },
        {
            "name": "Lynx",
            "mode": 5
        }
    ]
}
"#,
    )
    .unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    // 6-byte payload behind a little-endian length header.
    fs::write(
        dir.path().join("assets/route.bin"),
        [6, 0, 0, 0, 1, 2, 3, 4, 5, 6],
    )
    .unwrap();
    dir
}

fn rw() -> Command {
    let mut cmd = Command::cargo_bin("rw").unwrap();
    cmd.env_remove("RW_LOG");
    cmd
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_scenario_directory() {
    let parent = TempDir::new().unwrap();
    rw().args(["init", "range", "--entities", "3"])
        .current_dir(parent.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created scenario 'range'"));

    assert!(parent.path().join("range/scenario.json").exists());
    assert!(parent.path().join("range/assets/route.bin").exists());
}

#[test]
fn init_fails_if_dir_exists() {
    let parent = TempDir::new().unwrap();
    fs::create_dir(parent.path().join("range")).unwrap();

    rw().args(["init", "range"])
        .current_dir(parent.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_is_deterministic_per_seed() {
    let parent = TempDir::new().unwrap();
    for name in ["a", "b"] {
        rw().args(["init", name, "--seed", "9"])
            .current_dir(parent.path())
            .assert()
            .success();
    }
    let a = fs::read_to_string(parent.path().join("a/scenario.json")).unwrap();
    let b = fs::read_to_string(parent.path().join("b/scenario.json")).unwrap();
    assert_eq!(a.replace("\"a\"", "\"x\""), b.replace("\"b\"", "\"x\""));
}

#[test]
fn init_then_run() {
    let parent = TempDir::new().unwrap();
    rw().args(["init", "range", "--entities", "6"])
        .current_dir(parent.path())
        .assert()
        .success();

    rw().args(["run", "--ticks", "8"])
        .current_dir(parent.path().join("range"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Actor Status"))
        .stdout(predicate::str::contains("Rotor-05"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_passes_valid_scenario() {
    let dir = test_scenario();
    rw().arg("check")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed for 'Test Range'"))
        .stdout(predicate::str::contains("2 actors, 1 turrets"));
}

#[test]
fn check_warns_on_missing_asset() {
    let dir = test_scenario();
    fs::remove_file(dir.path().join("assets/route.bin")).unwrap();
    rw().arg("check")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("path asset 'route.bin' not found"));
}

#[test]
fn check_fails_invalid_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("scenario.json"), "{ not json").unwrap();
    rw().arg("check")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid scenario"));
}

#[test]
fn check_fails_invalid_actor() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("scenario.json"),
        r#"{ "name": "Bad", "actors": [ { "name": "Hind", "mode": 9 } ] }"#,
    )
    .unwrap();
    rw().arg("check")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("actor #0"))
        .stderr(predicate::str::contains("does not fit in 3 bits"));
}

#[test]
fn check_fails_invalid_config() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("scenario.json"),
        r#"{ "name": "Bad", "config": { "aim_step": -4 } }"#,
    )
    .unwrap();
    rw().arg("check")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("aim_step must not be negative"));
}

#[test]
fn check_missing_file() {
    let dir = TempDir::new().unwrap();
    rw().arg("check")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_shows_status_table() {
    let dir = test_scenario();
    rw().args(["run", "--ticks", "4"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("'Test Range'"))
        .stdout(predicate::str::contains("Hind"))
        .stdout(predicate::str::contains("fallback(5)"));
}

#[test]
fn run_verbose_lists_forwarded_events() {
    let dir = test_scenario();
    rw().args(["run", "--ticks", "4", "--verbose"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Event Log"))
        .stdout(predicate::str::contains("Hind spawned"))
        .stdout(predicate::str::contains("0x0101"));
}

#[test]
fn run_json_snapshot() {
    let dir = test_scenario();
    let output = rw()
        .args(["run", "--ticks", "4", "--json"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);

    let hind = &records[0];
    assert_eq!(hind["name"], "Hind");
    assert_eq!(hind["path_len"], 6);
    assert_eq!(hind["altitude"]["current"], 40);
    // (800 - 0) / 8 on the primary branch.
    assert_eq!(hind["derived"]["velocity"], 100);
    assert_eq!(hind["orientation"]["yaw"], 64);
}

#[test]
fn run_reports_division_faults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("scenario.json"),
        r#"{
    "name": "Faulty",
    "config": { "pursuit_divisor": 0 },
    "actors": [ { "name": "Hind", "mode": 1 }, { "name": "Lynx" } ]
}"#,
    )
    .unwrap();
    rw().args(["run", "--ticks", "2"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 entity ticks aborted"))
        .stdout(predicate::str::contains("FAULT"))
        .stdout(predicate::str::contains("division by zero"));
}

#[test]
fn run_reports_missing_asset() {
    let dir = test_scenario();
    fs::remove_file(dir.path().join("assets/route.bin")).unwrap();
    rw().args(["run", "--ticks", "1"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("WARN"))
        .stdout(predicate::str::contains("could not load 'route.bin'"));
}

#[test]
fn run_with_explicit_scenario_path() {
    let dir = test_scenario();
    let path = dir.path().join("scenario.json");
    rw().args(["run", "--ticks", "1", "--scenario"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Range"));
}
