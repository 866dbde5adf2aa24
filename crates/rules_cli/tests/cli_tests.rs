use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

/// Helper to create a Command for the rve binary
#[allow(deprecated)]
fn rve() -> Command {
    Command::cargo_bin("rve").expect("Failed to find rve binary")
}

// ============================================================================
// check command tests
// ============================================================================

#[test]
fn test_check_valid_rules() {
    rve()
        .arg("check")
        .arg(fixture_path("signup.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule file is valid"))
        .stdout(predicate::str::contains("not:empty, alphaNumeric, length"))
        .stdout(predicate::str::contains("tags.*"));
}

#[test]
fn test_check_toml_rules() {
    rve()
        .arg("check")
        .arg(fixture_path("signup.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("5 rule(s) on 4 field(s)"));
}

#[test]
fn test_check_unknown_handler() {
    rve()
        .arg("check")
        .arg(fixture_path("unknown_handler.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("palindrome"));
}

#[test]
fn test_check_malformed_rules() {
    rve()
        .arg("check")
        .arg(fixture_path("malformed.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_missing_file() {
    rve()
        .arg("check")
        .arg("nonexistent.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// validate command tests
// ============================================================================

#[test]
fn test_validate_passing_document() {
    rve()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg(fixture_path("valid_user.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"));
}

#[test]
fn test_validate_yaml_document() {
    rve()
        .arg("validate")
        .arg(fixture_path("signup.toml"))
        .arg(fixture_path("valid_user.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn test_validate_failing_document() {
    rve()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg(fixture_path("invalid_user.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Validation FAILED"))
        .stdout(predicate::str::contains("must be between 18 and 130 years"))
        .stdout(predicate::str::contains("tags.1"));
}

#[test]
fn test_validate_json_output() {
    let output = rve()
        .arg("validate")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("signup.yml"))
        .arg(fixture_path("invalid_user.json"))
        .output()
        .expect("Failed to run rve");

    assert!(!output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["passed"], false);
    assert_eq!(
        report["errors"]["age"][0],
        "must be between 18 and 130 years"
    );
    assert!(report["errors"]["email"].is_array());
    assert!(report["errors"].get("tags.0").is_none());
    assert!(report["errors"]["tags.1"].is_array());
}

#[test]
fn test_validate_event_filter() {
    // password is only checked on "create"
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("user.json");
    fs::write(
        &data,
        r#"{"username": "ada99", "email": "ada@example.com", "age": 36, "tags": ["math"], "password": "short"}"#,
    )
    .unwrap();

    rve()
        .arg("validate")
        .arg("--on")
        .arg("update")
        .arg(fixture_path("signup.yml"))
        .arg(&data)
        .assert()
        .success();

    rve()
        .arg("validate")
        .arg("--on")
        .arg("create")
        .arg(fixture_path("signup.yml"))
        .arg(&data)
        .assert()
        .failure()
        .stdout(predicate::str::contains("password"));
}

#[test]
fn test_validate_custom_required_message() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("user.json");
    fs::write(&data, r#"{"username": "ada99", "age": 36, "tags": []}"#).unwrap();

    rve()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg(&data)
        .assert()
        .failure()
        .stdout(predicate::str::contains("cannot be missing"));
}

#[test]
fn test_validate_unknown_handler_is_error() {
    rve()
        .arg("validate")
        .arg(fixture_path("unknown_handler.yml"))
        .arg(fixture_path("valid_user.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("palindrome"));
}

#[test]
fn test_validate_missing_data_file() {
    rve()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg("missing.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse data file"));
}

// ============================================================================
// handlers command tests
// ============================================================================

#[test]
fn test_handlers_lists_builtins() {
    rve()
        .arg("handlers")
        .assert()
        .success()
        .stdout(predicate::str::contains("email"))
        .stdout(predicate::str::contains("format set"))
        .stdout(predicate::str::contains("creditCard"));
}

// ============================================================================
// general CLI tests
// ============================================================================

#[test]
fn test_help() {
    rve()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule Validation Engine"));
}

#[test]
fn test_version() {
    rve()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rve"));
}
