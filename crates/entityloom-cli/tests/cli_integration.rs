use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn entityloom() -> Command {
    Command::cargo_bin("entityloom").unwrap()
}

#[test]
fn help_exits_zero() {
    entityloom().arg("--help").assert().success().stdout(predicate::str::contains("entityloom"));
}

#[test]
fn version_exits_zero() {
    entityloom().arg("--version").assert().success();
}

#[test]
fn unknown_flag_is_usage_error() {
    entityloom().arg("--not-a-flag").assert().failure().code(1);
}

#[test]
fn missing_schema_dir_is_usage_error() {
    entityloom().args(["--schema-dir", "/definitely/not/a/real/path"]).assert().failure().code(1);
}

#[test]
fn loads_schemas_and_data_then_exits_success() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("home.yaml");
    std::fs::write(
        &schema_path,
        "profile_name: SmartHome\nfields:\n  name:\n    type: string\n    required: true\n",
    )
    .unwrap();
    let data_path = dir.path().join("homes.yaml");
    std::fs::write(&data_path, "- _schema: SmartHome\n  id: home1\n  name: Villa\n").unwrap();

    entityloom()
        .args(["--schema-dir", schema_path.to_str().unwrap(), "--data-dir", data_path.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn interactive_mode_echoes_one_json_response_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("home.yaml");
    std::fs::write(
        &schema_path,
        "profile_name: SmartHome\nfields:\n  name:\n    type: string\n    required: true\n",
    )
    .unwrap();

    let mut child = entityloom()
        .args(["--schema-dir", schema_path.to_str().unwrap(), "--interactive"])
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();

    {
        let stdin = child.stdin.as_mut().unwrap();
        writeln!(stdin, r#"{{"command":"getSchemaList"}}"#).unwrap();
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("SmartHome"));
}
