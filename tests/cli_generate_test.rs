//! Integration tests for the `generate` subcommand

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/openapi/petstore.yaml")
}

#[test]
fn test_generate_defaults_to_types() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("petstore");
    let mut cmd = Command::cargo_bin("apigen").unwrap();

    cmd.arg("generate")
        .arg("--spec")
        .arg(fixture())
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 3 file(s)"));

    assert!(output.join("internal/pkg/domain/types.go").exists());
    assert!(output.join("internal/pkg/domain/errors.go").exists());
    assert!(!output.join("cmd").exists());
}

#[test]
fn test_generate_http_with_custom_package() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("petstore");
    let mut cmd = Command::cargo_bin("apigen").unwrap();

    cmd.arg("generate")
        .arg("--spec")
        .arg(fixture())
        .arg("--output")
        .arg(&output)
        .arg("--package")
        .arg("models")
        .arg("--types")
        .arg("--http")
        .arg("--skip-deps")
        .assert()
        .success();

    let types = std::fs::read_to_string(output.join("internal/pkg/domain/types.go")).unwrap();
    assert!(types.contains("package models"));
    let handler =
        std::fs::read_to_string(output.join("internal/adapters/http/pet/handler.go")).unwrap();
    assert!(handler.contains("models.NewNotImplementedError(\"listPets\")"));
}

#[test]
fn test_generate_second_run_skips_stable_files() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("petstore");

    for _ in 0..2 {
        Command::cargo_bin("apigen")
            .unwrap()
            .args(["generate", "--types", "--spec"])
            .arg(fixture())
            .arg("--output")
            .arg(&output)
            .assert()
            .success();
    }

    Command::cargo_bin("apigen")
        .unwrap()
        .args(["generate", "--types", "--spec"])
        .arg(fixture())
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 0 file(s)"))
        .stdout(predicate::str::contains("2 skipped"));
}

#[test]
fn test_generate_unknown_schema_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("apigen").unwrap();

    cmd.arg("generate")
        .arg("--spec")
        .arg(fixture())
        .arg("--output")
        .arg(temp_dir.path())
        .arg("--schema")
        .arg("Order")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Order"));
}

#[test]
fn test_generate_missing_spec_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("apigen").unwrap();

    cmd.arg("generate")
        .arg("--spec")
        .arg(temp_dir.path().join("missing.yaml"))
        .arg("--output")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to generate"));
}

#[test]
fn test_generate_rejects_invalid_package() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("apigen").unwrap();

    cmd.arg("generate")
        .arg("--spec")
        .arg(fixture())
        .arg("--output")
        .arg(temp_dir.path())
        .arg("--package")
        .arg("not-valid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid package name"));
}
