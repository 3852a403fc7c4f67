//! End-to-end tests for the hrguard binary.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DUPLICATE_MANAGER: &str = r"
[[directory.departments]]
manager_id = 50
department_id = 1302

[[directory.departments]]
manager_id = 50
department_id = 1400
";

const PROJECT_CONFIG: &str = r"
[directory]
lookup_timeout_ms = 200

[[directory.departments]]
manager_id = 50
department_id = 1302
";

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("hrguard.toml"), PROJECT_CONFIG).unwrap();
    temp
}

fn hrguard(project: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hrguard").unwrap();
    cmd.arg("--no-color")
        .arg("--project")
        .arg(project.path())
        .env_remove("RUST_LOG");
    cmd
}

fn check_json(project: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = hrguard(project)
        .arg("check")
        .args(args)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// Informational Commands
// ============================================================================

#[test]
fn version_command_succeeds() {
    let project = project();
    hrguard(&project)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hrguard"));
}

#[test]
fn roles_lists_every_role() {
    let project = project();
    hrguard(&project)
        .arg("roles")
        .assert()
        .success()
        .stdout(predicate::str::contains("department_manager"))
        .stdout(predicate::str::contains("HR Specialist"))
        .stdout(predicate::str::contains("own department"));
}

#[test]
fn matrix_table_lists_capabilities() {
    let project = project();
    hrguard(&project)
        .arg("matrix")
        .assert()
        .success()
        .stdout(predicate::str::contains("canViewPayroll"))
        .stdout(predicate::str::contains("canRequestLeave"));
}

#[test]
fn matrix_json_is_complete() {
    let project = project();
    let output = hrguard(&project)
        .args(["matrix", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let roles = value.as_array().unwrap();
    assert_eq!(roles.len(), 6);
    for role in roles {
        assert_eq!(role["permissions"].as_object().unwrap().len(), 19);
    }
}

#[test]
fn config_shows_project_values() {
    let project = project();
    hrguard(&project)
        .args(["config", "--format", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lookup_timeout_ms = 200"))
        .stdout(predicate::str::contains("manager_id = 50"));
}

// ============================================================================
// Decisions
// ============================================================================

#[test]
fn mapped_manager_gets_department_scope() {
    let project = project();
    let value = check_json(&project, &["50", "department_manager", "canViewEmployees"]);

    assert_eq!(value["allowed"], true);
    assert_eq!(value["degraded"], false);
    assert_eq!(value["scope"]["kind"], "department_only");
    assert_eq!(value["scope"]["id"], 1302);

    let granted = value["granted"].as_array().unwrap();
    assert!(granted.contains(&serde_json::json!("canViewEmployees")));
    assert!(!granted.contains(&serde_json::json!("canViewAllData")));
}

#[test]
fn unmapped_manager_gets_empty_scope() {
    let project = project();
    let value = check_json(&project, &["51", "department_manager", "canViewEmployees"]);

    assert_eq!(value["allowed"], true);
    assert_eq!(value["scope"]["kind"], "none");
}

#[test]
fn unknown_role_claim_degrades_to_employee() {
    let project = project();
    let value = check_json(&project, &["3", "superuser", "canViewPayroll"]);

    assert_eq!(value["role"], "employee");
    assert_eq!(value["degraded"], true);
    assert_eq!(value["allowed"], false);
    assert!(value["scope"].is_null());
}

#[test]
fn table_output_marks_denials() {
    let project = project();
    hrguard(&project)
        .args(["check", "20", "hr_specialist", "canViewPayroll"])
        .assert()
        .success()
        .stdout(predicate::str::contains("denied"));
}

#[test]
fn strict_mode_fails_on_denial() {
    let project = project();
    hrguard(&project)
        .args(["check", "20", "hr_specialist", "canViewPayroll", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not authorized"));

    hrguard(&project)
        .args(["check", "1", "owner", "canViewPayroll", "--strict"])
        .assert()
        .success();
}

#[test]
fn unknown_capability_is_rejected() {
    let project = project();
    hrguard(&project)
        .args(["check", "1", "owner", "canLaunchRockets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown capability"));
}

#[test]
fn explicit_config_with_duplicate_manager_is_rejected() {
    let project = project();
    let path = project.path().join("broken.toml");
    fs::write(&path, DUPLICATE_MANAGER).unwrap();

    hrguard(&project)
        .arg("--config")
        .arg(&path)
        .args(["check", "50", "department_manager", "canViewEmployees"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than one department"));
}

#[test]
fn broken_project_config_only_fails_commands_that_read_it() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join("hrguard.toml"), DUPLICATE_MANAGER).unwrap();

    for command in ["version", "roles", "matrix"] {
        hrguard(&project).arg(command).assert().success();
    }

    hrguard(&project)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than one department"));
}
