use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::tempdir;

fn mcpdesk(config_path: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("mcpdesk").unwrap();
    cmd.env("MCPDESK_CONFIG", config_path);
    cmd
}

#[test]
fn test_saved_add_edit_remove() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");

    mcpdesk(&config_path)
        .args(["saved", "add", "time", "--cmd", "uvx", "--arg", "mcp-server-time"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved server"));

    mcpdesk(&config_path)
        .args(["saved", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uvx mcp-server-time"));

    mcpdesk(&config_path)
        .args(["saved", "edit", "time", "--rename", "clock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed saved server"));

    mcpdesk(&config_path)
        .args(["saved", "show", "clock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"clock\""));

    mcpdesk(&config_path)
        .args(["saved", "show", "time"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Saved server 'time' not found"));

    mcpdesk(&config_path)
        .args(["--yes", "saved", "remove", "clock"])
        .assert()
        .success();

    mcpdesk(&config_path)
        .args(["saved", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved servers"));
}

#[test]
fn test_saved_rename_onto_existing_name() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");

    for (name, cmd) in [("a", "one"), ("b", "two")] {
        mcpdesk(&config_path)
            .args(["saved", "add", name, "--cmd", cmd])
            .assert()
            .success();
    }

    mcpdesk(&config_path)
        .args(["saved", "edit", "a", "--rename", "b", "--cmd", "three"])
        .assert()
        .success();

    let output = mcpdesk(&config_path)
        .args(["--format", "json", "saved", "list"])
        .output()
        .unwrap();
    let saved: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(saved, json!([["b", {"command": "three"}]]));
}

#[test]
fn test_use_copies_into_project() {
    let dir = tempdir().unwrap();
    let project = tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");

    mcpdesk(&config_path)
        .args(["saved", "add", "fs", "--cmd", "npx", "--arg=-y", "--arg", "pkg"])
        .assert()
        .success();

    mcpdesk(&config_path)
        .arg("--dir")
        .arg(project.path())
        .args(["saved", "use", "fs"])
        .assert()
        .success();

    mcpdesk(&config_path)
        .arg("--dir")
        .arg(project.path())
        .args(["edit", "fs", "--arg", "other"])
        .assert()
        .success();

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(project.path().join(".mcp.json")).unwrap())
            .unwrap();
    assert_eq!(written, json!({"mcpServers": {"fs": {"command": "npx", "args": ["other"]}}}));

    // editing the project copy upserts the library entry under the same name
    mcpdesk(&config_path)
        .args(["saved", "show", "fs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("other"));
}

#[test]
fn test_saved_commands_leave_project_alone() {
    let dir = tempdir().unwrap();
    let project = tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");

    mcpdesk(&config_path)
        .arg("--dir")
        .arg(project.path())
        .args(["saved", "add", "x", "--cmd", "node"])
        .assert()
        .success();

    assert!(!project.path().join(".mcp.json").exists());
}
