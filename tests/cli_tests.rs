//! CLI integration tests for fs-inventory
//!
//! These tests run the compiled binary against temporary sites and check
//! stdout, stderr and exit codes.

mod common;

use assert_cmd::Command;
use common::TestSite;
use predicates::prelude::*;
use serde_json::Value;

/// Helper to get a clean fs-inventory command
fn fs_inventory() -> Command {
    let mut cmd = Command::cargo_bin("fs-inventory").unwrap();
    cmd.env_remove("FS_INVENTORY_CONFIG")
        .env_remove("FS_INVENTORY_ENVIRONMENT_DOMAIN")
        .env_remove("FS_INVENTORY_OS_CLASS_MAP")
        .env_remove("FS_INVENTORY_SUB_GROUP_MAP")
        .env_remove("RUST_LOG");
    cmd
}

fn sample_site() -> TestSite {
    let site = TestSite::new();
    site.definition("controller/localhost.yaml", "");
    site.definition("linux/lxr3-dck-[01-02].yaml", "vars:\n  owner: ops\n");
    site.definition(
        "linux/lxr3-vcs-01.yaml",
        "vars:\n  host_aliases: [git]\n",
    );
    site
}

// ============================================================================
// Argument handling
// ============================================================================

#[test]
fn test_help() {
    fs_inventory()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("--graph"));
}

#[test]
fn test_version() {
    fs_inventory()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fs-inventory"));
}

#[test]
fn test_list_and_host_conflict() {
    fs_inventory()
        .args(["--list", "--host", "web"])
        .assert()
        .failure();
}

#[test]
fn test_requires_site() {
    fs_inventory()
        .arg("--list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--site-directory"));
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_list_outputs_inventory_json() {
    let site = sample_site();
    let config = site.inline_config("example.org");

    let output = fs_inventory()
        .arg("--list")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    let mut hosts: Vec<&str> = json["all"]["hosts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h.as_str().unwrap())
        .collect();
    hosts.sort_unstable();
    assert_eq!(
        hosts,
        vec!["git", "localhost", "lxr3-dck-01", "lxr3-dck-02", "lxr3-vcs-01"]
    );
    assert_eq!(json["all"]["vars"], serde_json::json!({}));
    assert_eq!(
        json["_meta"]["hostvars"]["lxr3-dck-02"]["fqdn"],
        "lxr3-dck-02.example.org"
    );
    assert_eq!(json["_meta"]["hostvars"]["lxr3-dck-02"]["owner"], "ops");
}

#[test]
fn test_host_prints_single_host() {
    let site = sample_site();

    fs_inventory()
        .args(["-d", "example.org", "-s"])
        .arg(site.path())
        .args(["--host", "git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hostname\":\"lxr3-vcs-01\""))
        .stdout(predicate::str::contains("\"_meta\"").not());
}

#[test]
fn test_unknown_host_exit_code() {
    let site = sample_site();

    fs_inventory()
        .args(["-d", "example.org", "-s"])
        .arg(site.path())
        .args(["--host", "nope"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_yaml_output() {
    let site = sample_site();

    fs_inventory()
        .args(["-d", "example.org", "-s"])
        .arg(site.path())
        .args(["--host", "localhost", "--output", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("primary_group: ansible_controller"));
}

#[test]
fn test_graph() {
    let site = sample_site();
    let config = site.inline_config("example.org");

    fs_inventory()
        .arg("--graph")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("@site:\n"))
        .stdout(predicate::str::contains("  |--@dck:\n"))
        .stdout(predicate::str::contains("  |  |--lxr3-dck-01\n"));
}

#[test]
fn test_limit() {
    let site = sample_site();
    let config = site.inline_config("example.org");

    let output = fs_inventory()
        .arg("--config")
        .arg(&config)
        .args(["--limit", "lxr3-dck-01.example.org"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["all"]["hosts"], serde_json::json!(["lxr3-dck-01"]));
}

#[test]
fn test_mock_host() {
    fs_inventory()
        .args(["-d", "example.org", "-s", "/nonexistent/site"])
        .args(["--mock-host", "wl10-ofc-99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hosts\":[\"wl10-ofc-99\"]"))
        .stdout(predicate::str::contains("\"primary_group\":\"\""));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_map_file_exit_code() {
    let site = sample_site();

    fs_inventory()
        .args(["-d", "example.org", "-s"])
        .arg(site.path())
        .args(["--os-class-map", "/nonexistent/os_class_map.yaml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("os_class_map.yaml"));
}

#[test]
fn test_list_survives_unnameable_keys() {
    let site = TestSite::new();
    site.definition("linux/lxr3-fso-01.yaml", "vars:\n  owner: ops\n");
    site.definition("linux/lxr3-fso-02.yaml", "vars:\n  ~: oops\n");

    let output = fs_inventory()
        .args(["-d", "example.org", "-s"])
        .arg(site.path())
        .arg("--list")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["_meta"]["hostvars"]["lxr3-fso-01"]["owner"], "ops");
    assert!(json["_meta"]["hostvars"]["lxr3-fso-02"].is_object());
}

#[test]
fn test_missing_definitions_exit_code() {
    fs_inventory()
        .args(["-d", "example.org", "-s", "/nonexistent/site"])
        .assert()
        .code(4);
}

#[test]
fn test_env_domain_override() {
    let site = sample_site();

    fs_inventory()
        .arg("-s")
        .arg(site.path())
        .env("FS_INVENTORY_ENVIRONMENT_DOMAIN", "lab.example.net")
        .args(["--host", "lxr3-dck-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lxr3-dck-01.lab.example.net"));
}
