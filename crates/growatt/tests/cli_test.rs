//! Integration tests for the `growatt` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run
//! without network access; the read commands run against wiremock.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `growatt` binary with env isolation.
///
/// Clears `GROWATT_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn growatt_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("growatt");
    cmd.env("HOME", "/tmp/growatt-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/growatt-cli-test-nonexistent")
        .env_remove("GROWATT_USERNAME")
        .env_remove("GROWATT_PASSWORD")
        .env_remove("GROWATT_OUTPUT")
        .env_remove("GROWATT_SERVER__BASE_URL")
        .env_remove("GROWATT_SERVER__TIMEOUT")
        .env_remove("GROWATT_ACCOUNT__USERNAME")
        .env_remove("GROWATT_ACCOUNT__PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// `growatt_cmd` with credentials, pointed at `server`.
fn mocked_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = growatt_cmd();
    cmd.env("GROWATT_USERNAME", "demo")
        .env("GROWATT_PASSWORD", "pw")
        .args(["--base-url", &server.uri()]);
    cmd
}

/// Run a prepared command off the async runtime so wiremock keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/newTwoLoginAPI.do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": true, "user": { "id": 7001 } }
        })))
        .mount(server)
        .await;
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = growatt_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    growatt_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Growatt")
            .and(predicate::str::contains("plants"))
            .and(predicate::str::contains("faults"))
            .and(predicate::str::contains("serve")),
    );
}

#[test]
fn test_version_flag() {
    growatt_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("growatt"));
}

#[test]
fn test_completions_zsh() {
    growatt_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    growatt_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_output_format() {
    let output = growatt_cmd()
        .args(["--output", "invalid", "plants"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_invalid_fault_date_is_usage_error() {
    let output = growatt_cmd()
        .args(["faults", "42", "--date", "yesterday"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_plants_without_credentials() {
    growatt_cmd()
        .arg("plants")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("credentials"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    growatt_cmd()
        .env("GROWATT_USERNAME", "demo")
        .env("GROWATT_PASSWORD", "pw")
        .args(["--timeout", "0", "plants"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("server.timeout"));
}

#[test]
fn test_serve_with_oversized_timeout_is_usage_error() {
    growatt_cmd()
        .args(["--timeout", "18446744073709551615", "serve", "--bind", "127.0.0.1:0"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("timeout"));
}

#[test]
fn test_config_show_no_config() {
    growatt_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("server.growatt.com"));
}

#[test]
fn test_config_show_masks_password() {
    growatt_cmd()
        .env("GROWATT_ACCOUNT__PASSWORD", "hunter2")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_path() {
    growatt_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Read commands against a mock server ─────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_plants_json_output() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/PlantListAPI.do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": true, "data": [{ "plantId": 42, "plantName": "Home" }] }
        })))
        .mount(&server)
        .await;

    let mut cmd = mocked_cmd(&server);
    cmd.args(["--output", "json", "plants"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let plants: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plants[0]["plantId"], json!("42"));
    assert_eq!(plants[0]["plantName"], json!("Home"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_plant_exit_code() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/newTwoPlantAPI.do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": true, "data": null }
        })))
        .mount(&server)
        .await;

    let mut cmd = mocked_cmd(&server);
    cmd.args(["plant", "999"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/newTwoLoginAPI.do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": false, "error": "Password is incorrect" }
        })))
        .mount(&server)
        .await;

    let mut cmd = mocked_cmd(&server);
    cmd.arg("login");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Password is incorrect"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_fault_log_is_success() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/newFaultLogAPI.do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "back": { "success": true, "data": [] }
        })))
        .mount(&server)
        .await;

    let mut cmd = mocked_cmd(&server);
    cmd.args(["faults", "42"]);
    let output = run(cmd).await;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No fault logs"));
}
