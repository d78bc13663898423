#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd!

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the caller's profile file and credentials
fn oscflow(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("oscflow").unwrap();
    cmd.current_dir(dir.path())
        .env("OSC_CONFIG_FILE", dir.path().join("missing.json"))
        .env_remove("OSC_PROFILE")
        .env_remove("OSC_ACCESS_KEY")
        .env_remove("OSC_SECRET_KEY")
        .env_remove("OSC_REGION")
        .env_remove("OSC_ENDPOINT_API");
    cmd
}

#[test]
fn test_cli_help() {
    let dir = tempfile::tempdir().unwrap();
    oscflow(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Outscale"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("refresh"))
        .stdout(predicate::str::contains("--state-dir"));
}

#[test]
fn test_types_lists_registry() {
    let dir = tempfile::tempdir().unwrap();
    oscflow(&dir)
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("security_group"))
        .stdout(predicate::str::contains("internet_service_link"))
        .stdout(predicate::str::contains("nat_service"))
        .stdout(predicate::str::contains("public_ips"));
}

#[test]
fn test_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    oscflow(&dir)
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("No resources recorded"));
}

#[test]
fn test_malformed_attribute() {
    let dir = tempfile::tempdir().unwrap();
    oscflow(&dir)
        .args(["create", "security_group", "web", "-a", "net_id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_unknown_resource_type() {
    let dir = tempfile::tempdir().unwrap();
    oscflow(&dir)
        .args(["create", "load_balancer", "lb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown type: load_balancer"));
}

#[test]
fn test_missing_credentials() {
    let dir = tempfile::tempdir().unwrap();
    oscflow(&dir)
        .args(["read", "nat_service", "-a", "nat_service_id=nat-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No credentials found"));
}

#[test]
fn test_refresh_unrecorded_resource() {
    let dir = tempfile::tempdir().unwrap();
    oscflow(&dir)
        .env("OSC_ACCESS_KEY", "AK")
        .env("OSC_SECRET_KEY", "SK")
        .args(["refresh", "public_ip", "ip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("public_ip:ip is not in the state file"));
}
