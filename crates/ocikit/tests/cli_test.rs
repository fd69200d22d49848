//! Integration tests for the `ocikit` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! error handling and exit codes. Service calls go to a local wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `ocikit` binary with env isolation.
///
/// Clears all `OCIKIT_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn ocikit_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ocikit");
    cmd.env("HOME", "/tmp/ocikit-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/ocikit-cli-test-nonexistent")
        .env_remove("OCIKIT_PROFILE")
        .env_remove("OCIKIT_REGION")
        .env_remove("OCIKIT_ENDPOINT")
        .env_remove("OCIKIT_COMPARTMENT_ID")
        .env_remove("OCIKIT_AUTH_TOKEN")
        .env_remove("OCIKIT_OUTPUT")
        .env_remove("OCIKIT_INSECURE")
        .env_remove("OCIKIT_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `ocikit_cmd` aimed at a mock endpoint with a token and compartment.
fn mocked_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = ocikit_cmd();
    cmd.args([
        "--endpoint",
        &server.uri(),
        "--auth-token",
        "test-token",
        "--compartment-id",
        "ocid1.compartment.oc1..c",
    ]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn load_balancer(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "compartmentId": "ocid1.compartment.oc1..c",
        "displayName": name,
        "lifecycleState": "ACTIVE",
        "timeCreated": "2024-05-01T12:00:00Z",
        "shapeName": "flexible",
        "ipAddresses": [{ "ipAddress": "203.0.113.10", "isPublic": true }]
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = ocikit_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    ocikit_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("load balancers")
            .and(predicate::str::contains("lb"))
            .and(predicate::str::contains("rm"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    ocikit_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ocikit"));
}

#[test]
fn test_wait_flags_in_subcommand_help() {
    ocikit_cmd()
        .args(["rm", "stacks", "create", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--wait-for-state")
                .and(predicate::str::contains("--max-wait-seconds"))
                .and(predicate::str::contains("--from-file")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    ocikit_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    ocikit_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ocikit"));
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = ocikit_cmd().arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_output_format() {
    let output = ocikit_cmd()
        .args(["-o", "xml", "lb", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("xml"), "Expected the rejected value in output:\n{text}");
}

#[test]
fn test_no_config_is_a_usage_error() {
    let output = ocikit_cmd().args(["lb", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("config init") || text.contains("region"),
        "Expected setup guidance in output:\n{text}"
    );
}

#[test]
fn test_config_show_without_file() {
    ocikit_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_unknown_wait_state_rejected_before_any_request() {
    // The endpoint is unroutable; a request would surface as exit code 7.
    let output = ocikit_cmd()
        .args([
            "--endpoint",
            "http://127.0.0.1:9",
            "--auth-token",
            "t",
            "--yes",
            "lb",
            "delete",
            "ocid1.loadbalancer.oc1..x",
            "--wait-for-state",
            "FINISHED",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("SUCCEEDED"), "Expected allowed values in output:\n{text}");
}

#[test]
fn test_delete_requires_yes_without_terminal() {
    let output = ocikit_cmd()
        .args([
            "--endpoint",
            "http://127.0.0.1:9",
            "--auth-token",
            "t",
            "rm",
            "stacks",
            "delete",
            "ocid1.ormstack.oc1..s",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

// ── Against a mock service ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_lb_list_plain_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancers"))
        .and(query_param("compartmentId", "ocid1.compartment.oc1..c"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            load_balancer("lb-1", "alpha"),
            load_balancer("lb-2", "beta"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    mocked_cmd(&server)
        .args(["-o", "plain", "lb", "list"])
        .assert()
        .success()
        .stdout("lb-1\nlb-2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lb_get_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancers/lb-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_balancer("lb-1", "alpha")))
        .mount(&server)
        .await;

    let output = mocked_cmd(&server)
        .args(["-o", "json", "lb", "get", "lb-1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["displayName"], "alpha");
    assert_eq!(body["lifecycleState"], "ACTIVE");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_exit_code_and_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/20180917/stacks/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("opc-request-id", "req-404")
                .set_body_json(json!({
                    "code": "NotAuthorizedOrNotFound",
                    "message": "Stack not found"
                })),
        )
        .mount(&server)
        .await;

    let output = mocked_cmd(&server)
        .args(["rm", "stacks", "get", "missing"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("Stack not found"), "output:\n{text}");
    assert!(text.contains("req-404"), "output:\n{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_job_create_waits_for_terminal_state() {
    let server = MockServer::start().await;
    let job = |state: &str| {
        json!({
            "id": "job-1",
            "stackId": "stack-1",
            "compartmentId": "ocid1.compartment.oc1..c",
            "operation": "APPLY",
            "lifecycleState": state,
            "timeCreated": "2024-05-01T12:00:00Z"
        })
    };
    Mock::given(method("POST"))
        .and(path("/20180917/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job("ACCEPTED")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/20180917/jobs/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job("FAILED")))
        .mount(&server)
        .await;

    let output = mocked_cmd(&server)
        .args([
            "rm",
            "jobs",
            "create",
            "--stack-id",
            "stack-1",
            "--operation",
            "apply",
            "--wait-for-state",
            "SUCCEEDED",
            "--max-wait-seconds",
            "30",
        ])
        .output()
        .unwrap();
    // FAILED is terminal and not a target
    assert_eq!(output.status.code(), Some(9));
    assert!(combined_output(&output).contains("FAILED"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stack_tf_config_written_to_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/20180917/stacks/stack-1/tfConfig"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/zip")
                .set_body_bytes(b"PK\x03\x04fake-zip".to_vec()),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("config.zip");
    mocked_cmd(&server)
        .args(["rm", "stacks", "tf-config", "stack-1", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("config.zip"));

    assert_eq!(std::fs::read(&out).unwrap(), b"PK\x03\x04fake-zip");
}
