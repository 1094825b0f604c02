//! Smoke tests -- verify the binary runs and the subcommands are wired up.

use assert_cmd::Command;
use predicates::prelude::*;

fn zwatch() -> Command {
    let mut cmd = Command::cargo_bin("zwatch").unwrap();
    // Keep a developer's local config out of the tests.
    cmd.env_remove("ZWATCH_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    zwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Sliding-window Z-score"));
}

#[test]
fn test_cli_version() {
    zwatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("zwatch"));
}

#[test]
fn test_run_flags_spike_from_stdin() {
    zwatch()
        .args(["run", "--window", "3", "--threshold", "1.5", "--format", "json"])
        .write_stdin("1\n2\n3\n100\n")
        .assert()
        .success()
        .stdout(predicates::str::contains(
            r#"{"index":3,"value":100.0,"score":98.0,"is_anomaly":true}"#,
        ));
}

#[test]
fn test_run_skips_non_finite_and_summarises() {
    zwatch()
        .args(["run", "--window", "3", "--anomalies-only", "--summary"])
        .write_stdin("1\nnan\n2\n3\n4\n")
        .assert()
        .success()
        .stdout(predicates::str::contains("ANOMALY").not())
        .stderr(predicates::str::contains("Rejected:  1"));
}

#[test]
fn test_run_reads_file_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("samples.txt");
    std::fs::write(&input, "10\n10\n10\n10\n10\n100\n").unwrap();

    zwatch()
        .args(["run", "--window", "5", "--threshold", "2", "--format", "json", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicates::str::contains(r#""is_anomaly":true"#).not());
}

#[test]
fn test_invalid_window_fails() {
    zwatch()
        .args(["run", "--window", "1"])
        .write_stdin("1\n2\n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid configuration"));
}

#[test]
fn test_bad_input_line_fails() {
    zwatch()
        .args(["run"])
        .write_stdin("1\nnot-a-number\n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("line 2"));
}

#[test]
fn test_simulate_is_reproducible() {
    let run = || {
        zwatch()
            .args(["simulate", "--count", "200", "--seed", "9", "--format", "json"])
            .output()
            .unwrap()
    };
    let a = run();
    let b = run();
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
    assert_eq!(String::from_utf8_lossy(&a.stdout).lines().count(), 200);
}

#[test]
fn test_config_prints_effective_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zwatch.toml");
    std::fs::write(&path, "[detector]\nwindow_size = 12\n").unwrap();

    zwatch()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .args(["--threshold", "2.5"])
        .assert()
        .success()
        .stdout(predicates::str::contains("window_size = 12"))
        .stdout(predicates::str::contains("threshold = 2.5"));
}

#[test]
fn test_unreadable_env_config_is_reported() {
    zwatch()
        .env("ZWATCH_CONFIG", "/nonexistent/zwatch.toml")
        .arg("config")
        .assert()
        .success()
        .stdout(predicates::str::contains("window_size = 50"))
        .stderr(predicates::str::contains(
            "ZWATCH_CONFIG set but file could not be loaded",
        ));
}
