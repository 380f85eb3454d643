//! End-to-end tests of the `planboard` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// A command isolated from the developer's own configuration, storing
/// records under `dir/data`
fn planboard(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("planboard").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .env("PLANBOARD_STORE__BACKEND", "file")
        .env("PLANBOARD_STORE__PATH", dir.join("data"));
    cmd
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_ops_lists_operations() {
    let temp = TempDir::new().unwrap();
    planboard(temp.path())
        .arg("ops")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"add card\""))
        .stdout(predicate::str::contains("\"link user\""))
        .stdout(predicate::str::contains("\"list activity\""));
}

#[test]
fn test_exec_persists_across_invocations() {
    let temp = TempDir::new().unwrap();

    let output = planboard(temp.path())
        .args(["exec", r#"{"op": "add project", "name": "Launch"}"#, "--actor", "ada"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let project = json_stdout(&output);
    assert_eq!(project["name"], "Launch");

    let output = planboard(temp.path())
        .args(["exec", r#"{"list": "projects"}"#])
        .output()
        .unwrap();
    assert!(output.status.success());
    let listed = json_stdout(&output);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["projects"][0]["id"], project["id"]);

    let output = planboard(temp.path())
        .args(["activity", "--limit", "5"])
        .output()
        .unwrap();
    let activity = json_stdout(&output);
    assert_eq!(activity["count"], 1);
    assert_eq!(activity["entries"][0]["op"], "add project");
    assert_eq!(activity["entries"][0]["actor"], "ada");
}

#[test]
fn test_exec_reads_batch_from_stdin() {
    let temp = TempDir::new().unwrap();
    let output = planboard(temp.path())
        .arg("exec")
        .write_stdin(
            r#"[
                {"op": "add project", "name": "One"},
                {"create": "project", "title": "Two"}
            ]"#,
        )
        .output()
        .unwrap();
    assert!(output.status.success());
    let results = json_stdout(&output);
    assert_eq!(results[0]["name"], "One");
    assert_eq!(results[1]["name"], "Two");
}

#[test]
fn test_missing_record_exits_with_error() {
    let temp = TempDir::new().unwrap();
    let output = planboard(temp.path())
        .args([
            "exec",
            r#"{"op": "get project", "id": "01ARZ3NDEKTSV4RRFFQ69G5FAV"}"#,
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let error = json_stdout(&output);
    assert_eq!(error["kind"], "not_found");
}

#[test]
fn test_unparseable_input_is_usage_error() {
    let temp = TempDir::new().unwrap();
    planboard(temp.path())
        .args(["exec", r#"{"op": "frobnicate card"}"#])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized operation"));
}

#[test]
fn test_missing_config_file_is_usage_error() {
    let temp = TempDir::new().unwrap();
    planboard(temp.path())
        .args(["ops", "--config", "nope.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn test_yaml_output() {
    let temp = TempDir::new().unwrap();
    planboard(temp.path())
        .args([
            "exec",
            r#"{"op": "add user", "email": "Ada@Example.com", "password_hash": "h"}"#,
            "--format",
            "yaml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("email: ada@example.com"));
}
