use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Single target with --dry-run should print the dry-run message and exit 0.
#[test]
fn test_single_target_dry_run() {
    cargo_bin_cmd!("vulnprobe")
        .args(&["http://example.com/?q=1", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN] Would scan target: http://example.com/?q=1"))
        .stdout(predicate::str::contains("\"payloadLevel\": 3"));
}

/// Config file values show up in the dry-run config, flags win over them.
#[test]
fn test_config_file_dry_run() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"payloadLevel": 5, "timeout": 30, "enableAuthTesting": true}}"#).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    cargo_bin_cmd!("vulnprobe")
        .args(&["http://example.com", "--config", &path, "--timeout", "4", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"payloadLevel\": 5"))
        .stdout(predicate::str::contains("\"timeout\": 4"))
        .stdout(predicate::str::contains("\"enableAuthTesting\": true"));
}

/// A broken config file is a fatal error.
#[test]
fn test_invalid_config_file_fails() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "not json").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    cargo_bin_cmd!("vulnprobe")
        .args(&["http://example.com", "--config", &path, "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file"));
}

/// Running with no arguments should fail (clap requires the target).
#[test]
fn test_no_args_shows_error() {
    cargo_bin_cmd!("vulnprobe")
        .assert()
        .failure();
}

/// Unparseable targets abort before any request is sent.
#[test]
fn test_invalid_target_fails() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("vulnprobe")
        .args(&["not a url", "-o"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid target URL"));
}

#[test]
fn test_malformed_header_fails() {
    cargo_bin_cmd!("vulnprobe")
        .args(&["http://example.com", "-H", "missing-colon", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid header"));
}

#[test]
fn test_unknown_module_rejected() {
    cargo_bin_cmd!("vulnprobe")
        .args(&["http://example.com", "--modules", "xss,rce", "--dry-run"])
        .assert()
        .failure();
}
