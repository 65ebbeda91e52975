use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::{tempdir, TempDir};

struct Env {
    home: TempDir,
    project: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            home: tempdir().unwrap(),
            project: tempdir().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("mcpdesk").unwrap();
        cmd.env("MCPDESK_CONFIG", self.home.path().join("config.yaml"));
        cmd.arg("--dir").arg(self.project.path());
        cmd
    }

    fn project_file(&self) -> Value {
        read_json(&self.project.path().join(".mcp.json"))
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_add_writes_project_file() {
    let env = Env::new();

    env.cmd()
        .args([
            "add",
            "fs",
            "--cmd",
            "npx",
            "--arg=-y",
            "--arg",
            "@modelcontextprotocol/server-filesystem",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added server"));

    assert_eq!(
        env.project_file(),
        json!({"mcpServers": {"fs": {"command": "npx", "args": ["-y", "@modelcontextprotocol/server-filesystem"]}}})
    );

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("fs").and(predicate::str::contains("Saved servers")));
}

#[test]
fn test_edit_rename_and_env() {
    let env = Env::new();

    env.cmd()
        .args(["add", "git", "--cmd", "uvx", "--arg", "mcp-server-git"])
        .assert()
        .success();

    env.cmd()
        .args(["edit", "git", "--rename", "vcs", "--env", "GIT_DIR=.git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed server"));

    assert_eq!(
        env.project_file(),
        json!({"mcpServers": {"vcs": {
            "command": "uvx",
            "args": ["mcp-server-git"],
            "env": {"GIT_DIR": ".git"}
        }}})
    );

    env.cmd()
        .args(["show", "vcs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"GIT_DIR\": \".git\""));
}

#[test]
fn test_add_from_json() {
    let env = Env::new();

    env.cmd()
        .args(["add", "--json", r#"{"mcpServers": {"time": {"command": "uvx", "args": [], "env": {}}}}"#])
        .assert()
        .success();

    assert_eq!(
        env.project_file(),
        json!({"mcpServers": {"time": {"command": "uvx"}}})
    );

    env.cmd()
        .args(["add", "mine", "--json", r#"{"command": "node"}"#])
        .assert()
        .success();

    assert_eq!(
        env.project_file(),
        json!({"mcpServers": {"mine": {"command": "node"}, "time": {"command": "uvx"}}})
    );
}

#[test]
fn test_invalid_input_is_reported() {
    let env = Env::new();

    env.cmd()
        .args(["add", "bad", "--cmd", "node", "--env-json", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON format for environment variables"));

    env.cmd()
        .args(["add", "--json", r#"{"mcpServers": {"x": {"args": ["a"]}}}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("command is required"));

    env.cmd()
        .args(["add", "--json", r#"{"mcpServers": {}}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No servers found"));

    assert!(!env.project.path().join(".mcp.json").exists());
}

#[test]
fn test_remove_last_server_clears_file() {
    let env = Env::new();

    env.cmd()
        .args(["add", "a", "--cmd", "node"])
        .assert()
        .success();

    env.cmd()
        .args(["--yes", "remove", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed server"));

    assert_eq!(env.project_file(), json!({"mcpServers": {}}));
}

#[test]
fn test_remove_without_confirmation_keeps_server() {
    let env = Env::new();

    env.cmd()
        .args(["add", "a", "--cmd", "node"])
        .assert()
        .success();

    env.cmd()
        .args(["remove", "a"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Cancelled"));

    assert_eq!(
        env.project_file(),
        json!({"mcpServers": {"a": {"command": "node"}}})
    );
}

#[test]
fn test_remove_unknown_server() {
    let env = Env::new();
    env.cmd()
        .args(["--yes", "remove", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Server 'ghost' not found"));
}

#[test]
fn test_import_and_validate() {
    let env = Env::new();
    let doc = env.project.path().join("import.json");
    std::fs::write(
        &doc,
        r#"{"mcpServers": {"fs": {"command": "npx", "args": ["-y", "pkg"]}, "gh": {"command": "docker", "env": {"TOKEN": "t"}}}}"#,
    )
    .unwrap();

    env.cmd()
        .arg("import")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 2"));

    env.cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));

    env.cmd()
        .args(["--format", "json", "saved", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"gh\""));
}

#[test]
fn test_validate_empty_project_fails() {
    let env = Env::new();
    env.cmd()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No servers found"));
}

#[test]
fn test_clear_writes_empty_document() {
    let env = Env::new();
    env.cmd()
        .args(["add", "a", "--cmd", "node"])
        .assert()
        .success();

    env.cmd().args(["--yes", "clear"]).assert().success();
    assert_eq!(env.project_file(), json!({"mcpServers": {}}));
}
