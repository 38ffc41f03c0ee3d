//! End-to-end tests driving the lfhff binary

mod common;

use assert_cmd::Command;
use common::{hosts_file, with_sentinel, SAMPLE_RECORDS};
use predicates::prelude::*;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

/// Command with an isolated config pointing at `hosts`
fn lfhff(config_dir: &TempDir, hosts: &Path) -> Command {
    let config_path = config_dir.path().join("config.toml");
    let config_content = format!("[hosts]\npath = \"{}\"\n", hosts.display());
    std::fs::write(&config_path, config_content).expect("Failed to write config");

    let mut cmd = Command::cargo_bin("lfhff").expect("lfhff binary should build");
    cmd.env_remove("LFHFF_HOSTS_FILE")
        .env_remove("LFHFF_MAX_RECORD_LEN")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config_path);
    cmd
}

fn sorted_hosts() -> NamedTempFile {
    hosts_file(&with_sentinel(SAMPLE_RECORDS))
}

#[test]
fn test_lookup_found() {
    let dir = TempDir::new().unwrap();
    let hosts = sorted_hosts();

    lfhff(&dir, hosts.path())
        .args(["lookup", "GAMMA.example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.0.0.2"))
        .stdout(predicate::str::contains("gamma.example"))
        .stdout(predicate::str::contains("beta.example"));
}

#[test]
fn test_lookup_not_found() {
    let dir = TempDir::new().unwrap();
    let hosts = sorted_hosts();

    lfhff(&dir, hosts.path())
        .args(["lookup", "omega.example"])
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Not found: omega.example"));
}

#[test]
fn test_lookup_invalid_name() {
    let dir = TempDir::new().unwrap();
    let hosts = sorted_hosts();

    lfhff(&dir, hosts.path())
        .args(["lookup", "bad..name"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_lookup_json_output() {
    let dir = TempDir::new().unwrap();
    let hosts = hosts_file(SAMPLE_RECORDS);

    let output = lfhff(&dir, hosts.path())
        .args(["--format", "json", "lookup", "zeta.example"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["address"], "10.0.0.9");
    assert_eq!(parsed[0]["matched_name"], "zeta.example");
}

#[test]
fn test_lookup_csv_output() {
    let dir = TempDir::new().unwrap();
    let hosts = sorted_hosts();

    lfhff(&dir, hosts.path())
        .args(["--format", "csv", "lookup", "alpha.example"])
        .assert()
        .success()
        .stdout("ADDRESS,NAME,CANONICAL\n10.0.0.1,alpha.example,alpha.example\n");
}

#[test]
fn test_hosts_file_flag_overrides_config() {
    let dir = TempDir::new().unwrap();
    let configured = hosts_file("10.9.9.9 other.example\n");
    let flagged = sorted_hosts();

    lfhff(&dir, configured.path())
        .arg("--hosts-file")
        .arg(flagged.path())
        .args(["lookup", "beta.example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.0.0.2"));
}

#[test]
fn test_mode_reports_sorted_and_linear() {
    let dir = TempDir::new().unwrap();
    let sorted = sorted_hosts();
    let plain = hosts_file(SAMPLE_RECORDS);

    lfhff(&dir, sorted.path())
        .arg("mode")
        .assert()
        .success()
        .stdout(predicate::str::contains("sorted (LFHFF v1)"));

    lfhff(&dir, plain.path())
        .arg("mode")
        .assert()
        .success()
        .stdout(predicate::str::contains("linear"));
}

#[test]
fn test_verify_clean_file() {
    let dir = TempDir::new().unwrap();
    let hosts = sorted_hosts();

    lfhff(&dir, hosts.path())
        .args(["verify", "--probes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Records:         3"))
        .stdout(predicate::str::ends_with("OK\n"));
}

#[test]
fn test_verify_out_of_order_file() {
    let dir = TempDir::new().unwrap();
    let hosts = hosts_file(&with_sentinel(
        "10.0.0.9 zeta.example\n10.0.0.1 alpha.example\n10.0.0.5 mu.example\n",
    ));

    lfhff(&dir, hosts.path())
        .arg("verify")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("out-of-order"))
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn test_missing_hosts_file() {
    let dir = TempDir::new().unwrap();

    lfhff(&dir, Path::new("/nonexistent/lfhff/hosts"))
        .args(["lookup", "alpha.example"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open hosts file"));
}

#[test]
fn test_invalid_record_len_env() {
    let dir = TempDir::new().unwrap();
    let hosts = sorted_hosts();

    lfhff(&dir, hosts.path())
        .env("LFHFF_MAX_RECORD_LEN", "0")
        .args(["lookup", "alpha.example"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_shows_effective_settings() {
    let dir = TempDir::new().unwrap();
    let hosts = sorted_hosts();

    lfhff(&dir, hosts.path())
        .args(["--max-record-len", "1024", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains(hosts.path().display().to_string()))
        .stdout(predicate::str::contains("Max record len: 1024"));
}

#[test]
fn test_huge_record_len_still_resolves() {
    let dir = TempDir::new().unwrap();
    let hosts = sorted_hosts();

    lfhff(&dir, hosts.path())
        .args(["--max-record-len", "18446744073709551615", "lookup", "zeta.example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.0.0.9"));

    lfhff(&dir, hosts.path())
        .env("LFHFF_MAX_RECORD_LEN", "100000000000000")
        .args(["lookup", "omega.example"])
        .assert()
        .code(3);
}
