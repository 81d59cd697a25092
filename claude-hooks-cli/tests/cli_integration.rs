//! End-to-end tests for the `claude-hooks` binary against a mock webhook.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A command with a scrubbed environment whose config dirs live in `home`.
fn hooks_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("claude-hooks").unwrap();
    cmd.env_clear()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .current_dir(home.path());
    cmd
}

async fn webhook(status: u16, calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(status))
        .expect(calls)
        .mount(&server)
        .await;
    server
}

fn hook_url(server: &MockServer) -> String {
    format!("{}/hook", server.uri())
}

/// JSON bodies of every request the server received.
async fn bodies(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|req| serde_json::from_slice(&req.body).unwrap())
        .collect()
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    hooks_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("notification"))
        .stdout(predicate::str::contains("stop"))
        .stdout(predicate::str::contains("long-operation"))
        .stdout(predicate::str::contains("create-start-file"));
}

#[test]
fn test_no_command_prints_usage_and_fails() {
    let home = TempDir::new().unwrap();
    hooks_cmd(&home)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stop_posts_once_and_exits_zero() {
    let server = webhook(200, 1).await;
    let home = TempDir::new().unwrap();

    hooks_cmd(&home)
        .env("CLAUDE_HOOKS_WEBHOOK_URL", hook_url(&server))
        .arg("stop")
        .assert()
        .success();

    let bodies = bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let text = bodies[0]["text"].as_str().unwrap();
    assert!(text.to_lowercase().contains("stop"), "text was: {text}");
    assert!(bodies[0]["blocks"].is_array());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_event_makes_no_request() {
    let server = webhook(200, 0).await;
    let home = TempDir::new().unwrap();

    hooks_cmd(&home)
        .env("CLAUDE_HOOKS_WEBHOOK_URL", hook_url(&server))
        .arg("foo")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unrecognized event: 'foo'"));
}

#[test]
fn test_missing_configuration_fails_fast() {
    let home = TempDir::new().unwrap();
    hooks_cmd(&home)
        .arg("notification")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing configuration"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_is_delivery_failure() {
    let server = webhook(500, 1).await;
    let home = TempDir::new().unwrap();

    hooks_cmd(&home)
        .env("CLAUDE_HOOKS_WEBHOOK_URL", hook_url(&server))
        .arg("stop")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Delivery failed"))
        .stderr(predicate::str::contains("HTTP 500"));
}

#[test]
fn test_unreachable_endpoint_is_delivery_failure() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let home = TempDir::new().unwrap();

    hooks_cmd(&home)
        .env("CLAUDE_HOOKS_WEBHOOK_URL", format!("http://127.0.0.1:{port}/hook"))
        .arg("stop")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Delivery failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_legacy_env_vars_and_member_mention() {
    let server = webhook(200, 1).await;
    let home = TempDir::new().unwrap();

    hooks_cmd(&home)
        .env("SLACK_WEBHOOK_URL", hook_url(&server))
        .env("SLACK_MEMBER_ID", "U0123ABC")
        .arg("subagent-stop")
        .assert()
        .success();

    let body = bodies(&server).await.remove(0);
    let fields = body["blocks"][1]["fields"].as_array().unwrap();
    assert!(fields
        .iter()
        .any(|f| f["text"].as_str().unwrap().contains("<@U0123ABC>")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stdin_hook_input_fills_context() {
    let server = webhook(200, 1).await;
    let home = TempDir::new().unwrap();

    hooks_cmd(&home)
        .env("CLAUDE_HOOKS_WEBHOOK_URL", hook_url(&server))
        .arg("notification")
        .write_stdin(
            r#"{"session_id":"sess-42","cwd":"/work/savi","hook_event_name":"Notification","message":"Claude needs your permission to use Bash"}"#,
        )
        .assert()
        .success();

    let body = bodies(&server).await.remove(0);
    let rendered = body.to_string();
    assert!(rendered.contains("savi"));
    assert!(rendered.contains("sess-42"));
    assert!(rendered.contains("Claude needs your permission to use Bash"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_stdin_is_ignored() {
    let server = webhook(200, 1).await;
    let home = TempDir::new().unwrap();

    hooks_cmd(&home)
        .env("CLAUDE_HOOKS_WEBHOOK_URL", hook_url(&server))
        .arg("stop")
        .write_stdin("definitely not json")
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_file_flag() {
    let server = webhook(200, 1).await;
    let home = TempDir::new().unwrap();
    let config = home.path().join("hooks.toml");
    fs::write(
        &config,
        format!(
            "webhook_url = \"{}\"\nchannel = \"#builds\"\ntext_template = \"[{{event}}] {{project}}\"\n",
            hook_url(&server)
        ),
    )
    .unwrap();

    hooks_cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg("stop")
        .assert()
        .success();

    let body = bodies(&server).await.remove(0);
    assert_eq!(body["channel"], "#builds");
    let project = home.path().file_name().unwrap().to_string_lossy();
    assert_eq!(body["text"], format!("[stop] {project}"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_default_config_file_is_discovered() {
    let server = webhook(200, 1).await;
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config/claude-hooks");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("config.toml"),
        format!("webhook_url = \"{}\"\n", hook_url(&server)),
    )
    .unwrap();

    hooks_cmd(&home).arg("stop").assert().success();
}

#[test]
fn test_missing_config_file_flag_fails() {
    let home = TempDir::new().unwrap();
    hooks_cmd(&home)
        .args(["--config", "does-not-exist.toml", "stop"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration file not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_long_operation_with_duration() {
    let server = webhook(200, 1).await;
    let home = TempDir::new().unwrap();

    hooks_cmd(&home)
        .env("CLAUDE_HOOKS_WEBHOOK_URL", hook_url(&server))
        .args(["long-operation", "--duration", "95", "--operation-type", "Bash"])
        .assert()
        .success();

    let body = bodies(&server).await.remove(0);
    assert_eq!(body["blocks"][0]["text"]["text"], "⚠️ Long Bash Operation");
    assert!(body.to_string().contains("1m 35s"));
}

#[test]
fn test_long_operation_without_inputs_is_usage_error() {
    let home = TempDir::new().unwrap();
    hooks_cmd(&home)
        .arg("long-operation")
        .assert()
        .failure()
        .code(2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_start_file_round_trip_below_threshold_sends_nothing() {
    let server = webhook(200, 0).await;
    let home = TempDir::new().unwrap();
    let start = home.path().join("state/bash_start.tmp");

    hooks_cmd(&home)
        .args(["create-start-file", "--file"])
        .arg(&start)
        .assert()
        .success();
    assert!(start.exists());

    hooks_cmd(&home)
        .env("CLAUDE_HOOKS_WEBHOOK_URL", hook_url(&server))
        .args(["long-operation", "--threshold", "30", "--start-file"])
        .arg(&start)
        .assert()
        .success();
    assert!(!start.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_old_start_file_sends_long_operation() {
    let server = webhook(200, 1).await;
    let home = TempDir::new().unwrap();
    let start = home.path().join("bash_start.tmp");
    let started = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
        - 300;
    fs::write(&start, started.to_string()).unwrap();

    hooks_cmd(&home)
        .env("CLAUDE_HOOKS_WEBHOOK_URL", hook_url(&server))
        .args(["long-operation", "--start-file"])
        .arg(&start)
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_log_file_receives_debug_output() {
    let server = webhook(200, 1).await;
    let home = TempDir::new().unwrap();
    let log = home.path().join("logs/hooks.log");

    hooks_cmd(&home)
        .env("CLAUDE_HOOKS_WEBHOOK_URL", hook_url(&server))
        .env("CLAUDE_HOOKS_LOG_FILE", &log)
        .args(["--debug", "stop"])
        .assert()
        .success();

    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("Notification delivered"), "log was: {contents}");
}
