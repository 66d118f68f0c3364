//! CLI integration tests for the agentco command-line interface.
//!
//! Nothing here needs a running backend: the tests cover argument parsing,
//! help output, input rejected before any request is made, and the config
//! commands against a throwaway config directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the agentco binary with an isolated config directory.
fn agentco(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("agentco").unwrap();
    cmd.env("AGENTCO_CONFIG_DIR", config_dir.path())
        .env_remove("AGENTCO_API_URL")
        .env_remove("AGENTCO_CONTEXT")
        .env("NO_COLOR", "1");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("agentco"))
        .stdout(predicate::str::contains("AI company"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("agentco"));
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("agents"))
        .stdout(predicate::str::contains("tasks"))
        .stdout(predicate::str::contains("dev"))
        .stdout(predicate::str::contains("github"))
        .stdout(predicate::str::contains("keys"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_tasks_help_lists_board_and_move() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["tasks", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("board"))
        .stdout(predicate::str::contains("move"))
        .stdout(predicate::str::contains("progress"));
}

#[test]
fn test_project_plan_help() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["project", "plan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--generate"))
        .stdout(predicate::str::contains("--full"));
}

#[test]
fn test_dev_help_lists_watch() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["dev", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("pause"))
        .stdout(predicate::str::contains("watch"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Flag Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_global_flags_accepted() {
    let dir = TempDir::new().unwrap();
    agentco(&dir).args(["--verbose", "--help"]).assert().success();
    agentco(&dir).args(["--json", "--help"]).assert().success();
    agentco(&dir)
        .args(["--server", "http://localhost:9000/api", "--help"])
        .assert()
        .success();
    agentco(&dir)
        .args(["--context", "staging", "--help"])
        .assert()
        .success();
}

#[test]
fn test_invalid_subcommand() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_no_subcommand_shows_usage() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Local Validation Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_task_status_rejected() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["tasks", "move", "12", "running"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown task status"));
}

#[test]
fn test_progress_out_of_range_rejected_before_request() {
    let dir = TempDir::new().unwrap();
    // Unroutable server: reaching the network would hang or fail differently.
    agentco(&dir)
        .args(["--server", "http://127.0.0.1:9/api", "tasks", "progress", "1", "150"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "progress must be between 0 and 100, got 150",
        ));
}

#[test]
fn test_negative_progress_rejected() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["tasks", "progress", "1", "-5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("got -5"));
}

#[test]
fn test_malformed_key_rejected_without_force() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["keys", "add", "anthropic", "not-a-key"])
        .assert()
        .success()
        .stderr(predicate::str::contains("does not match the anthropic format sk-ant-*"))
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_unknown_service_rejected() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["keys", "add", "mistral", "m-123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown service"));
}

#[test]
fn test_create_task_without_project_fails() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["tasks", "create", "--title", "Write docs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no project given"));
}

#[test]
fn test_project_delete_requires_yes() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["project", "delete", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_config_dir() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("client.yaml"))
        .stdout(predicate::str::contains(dir.path().to_string_lossy().as_ref()));
}

#[test]
fn test_config_empty_state() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["config", "current-context"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No current context"));
    agentco(&dir)
        .args(["config", "get-contexts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No contexts configured"));
}

#[test]
fn test_config_context_lifecycle() {
    let dir = TempDir::new().unwrap();

    agentco(&dir)
        .args([
            "config",
            "set-context",
            "local",
            "--server",
            "http://localhost:8000/api",
            "--project",
            "3",
            "--session-env",
            "AGENTCO_SESSION",
            "--csrf-env",
            "AGENTCO_CSRF",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Context \"local\" created."))
        .stdout(predicate::str::contains("set as current context"));

    assert!(dir.path().join("client.yaml").exists());

    agentco(&dir)
        .args(["config", "current-context"])
        .assert()
        .success()
        .stdout(predicate::str::contains("local"));

    agentco(&dir)
        .args(["config", "get-contexts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*"))
        .stdout(predicate::str::contains("http://localhost:8000/api"));

    agentco(&dir)
        .args(["config", "set-context", "local", "--timeout", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modified"));

    agentco(&dir)
        .args(["--json", "config", "get-contexts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"current\": true"))
        .stdout(predicate::str::contains("\"timeout\": 5"));

    agentco(&dir)
        .args(["config", "delete-context", "local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    agentco(&dir)
        .args(["config", "current-context"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No current context"));
}

#[test]
fn test_set_context_rejects_zero_timeout() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args([
            "config",
            "set-context",
            "local",
            "--server",
            "http://localhost:8000/api",
            "--timeout",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout"));
    assert!(!dir.path().join("client.yaml").exists());
}

#[test]
fn test_zero_poll_interval_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("client.yaml"),
        "defaults:\n  poll-interval-ms: 0\n",
    )
    .unwrap();
    agentco(&dir)
        .args(["dev", "status", "-p", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("poll-interval-ms"));
}

#[test]
fn test_set_context_requires_server_for_new_context() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["config", "set-context", "local", "--project", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--server is required"));
}

#[test]
fn test_use_unknown_context_fails() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["config", "use-context", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn test_unknown_context_flag_fails_before_request() {
    let dir = TempDir::new().unwrap();
    agentco(&dir)
        .args(["--context", "missing", "tasks", "progress", "1", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}
