//! Integration tests for the pyscaff binary.

use std::fs;
use std::path::Path;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `pyscaff` command isolated from the user's config and environment.
fn pyscaff(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("pyscaff");
    cmd.current_dir(home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    pyscaff(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Python"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    pyscaff(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_new_command_help() {
    let temp = TempDir::new().unwrap();
    pyscaff(temp.path())
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--option"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--verify"));
}

#[test]
fn test_new_project_with_defaults() {
    let temp = TempDir::new().unwrap();

    pyscaff(temp.path())
        .args(["new", "my-lib", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 'my-lib'"));

    let root = temp.path().join("my-lib");
    for file in [
        "pyproject.toml",
        "README.md",
        "Makefile",
        "LICENSE",
        ".pre-commit-config.yaml",
        "src/my_lib/__init__.py",
        "tests/test_my_lib.py",
        "zensical.toml",
        ".github/workflows/main.yml",
    ] {
        assert!(root.join(file).is_file(), "missing {file}");
    }

    let pyproject = fs::read_to_string(root.join("pyproject.toml")).unwrap();
    assert!(pyproject.contains("name = \"my-lib\""));
}

#[test]
fn test_new_project_with_overrides() {
    let temp = TempDir::new().unwrap();

    pyscaff(temp.path())
        .args([
            "new", "tools", "-o", "layout=flat", "-o", "include_ci=n", "-o", "zensical=n", "--yes",
        ])
        .assert()
        .success();

    let root = temp.path().join("tools");
    assert!(root.join("tools/__init__.py").is_file());
    assert!(!root.join("src").exists());
    assert!(!root.join(".github").exists());
    assert!(!root.join("docs").exists());
}

#[test]
fn test_new_project_into_output_dir() {
    let temp = TempDir::new().unwrap();
    let parent = temp.path().join("code");
    fs::create_dir(&parent).unwrap();

    pyscaff(temp.path())
        .args(["new", "my-lib", "--yes", "--output-dir"])
        .arg(&parent)
        .assert()
        .success();

    assert!(parent.join("my-lib/pyproject.toml").is_file());
}

#[test]
fn test_new_project_dry_run() {
    let temp = TempDir::new().unwrap();

    pyscaff(temp.path())
        .args(["new", "my-lib", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("pyproject.toml"));

    assert!(!temp.path().join("my-lib").exists());
}

#[test]
fn test_new_project_already_exists() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("my-lib")).unwrap();

    pyscaff(temp.path())
        .args(["new", "my-lib", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_new_project_force_replaces_directory() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("my-lib");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("stale.txt"), "old").unwrap();

    pyscaff(temp.path())
        .args(["new", "my-lib", "--yes", "--force"])
        .assert()
        .success();

    assert!(root.join("pyproject.toml").is_file());
    assert!(!root.join("stale.txt").exists());
}

#[test]
fn test_new_with_verify_flag() {
    let temp = TempDir::new().unwrap();

    pyscaff(temp.path())
        .args(["new", "my-lib", "--yes", "--verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("core-files"))
        .stdout(predicate::str::contains("0 failed"));
}

#[test]
fn test_new_json_output() {
    let temp = TempDir::new().unwrap();

    let assert = pyscaff(temp.path())
        .args(["--output-format", "json", "new", "my-lib"])
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value["options"]["project_name"], "my-lib");
    assert!(value["files"].as_u64().unwrap() > 0);
    assert!(value["generated_at"].is_string());
}

#[test]
fn test_options_table() {
    let temp = TempDir::new().unwrap();

    pyscaff(temp.path())
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains("project_name"))
        .stdout(predicate::str::contains("src | flat"));
}

#[test]
fn test_options_json() {
    let temp = TempDir::new().unwrap();

    let assert = pyscaff(temp.path())
        .args(["options", "--format", "json"])
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let names: Vec<&str> = value["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"layout"));
    assert!(names.contains(&"open_source_license"));
}

#[test]
fn test_verify_generated_project() {
    let temp = TempDir::new().unwrap();
    pyscaff(temp.path())
        .args(["new", "my-lib", "--yes"])
        .assert()
        .success();

    pyscaff(temp.path())
        .args(["verify", "my-lib"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 failed"));
}

#[test]
fn test_verify_tampered_project_fails() {
    let temp = TempDir::new().unwrap();
    pyscaff(temp.path())
        .args(["new", "my-lib", "--yes"])
        .assert()
        .success();
    fs::remove_file(temp.path().join("my-lib/LICENSE")).unwrap();

    pyscaff(temp.path())
        .args(["verify", "my-lib"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("rule(s)"));
}

#[test]
fn test_verify_with_wrong_options_fails() {
    let temp = TempDir::new().unwrap();
    pyscaff(temp.path())
        .args(["new", "my-lib", "--yes"])
        .assert()
        .success();

    pyscaff(temp.path())
        .args(["verify", "my-lib", "-o", "layout=flat"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("layout-flat"));
}

#[test]
fn test_quiet_flag() {
    let temp = TempDir::new().unwrap();

    pyscaff(temp.path())
        .args(["-q", "new", "my-lib", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(temp.path().join("my-lib").is_dir());
}

#[test]
fn test_shell_completions() {
    let temp = TempDir::new().unwrap();
    pyscaff(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pyscaff"));
}

#[test]
fn test_init_then_config_round_trip() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("pyscaff.toml");

    pyscaff(temp.path())
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success();
    assert!(config.is_file());

    pyscaff(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "defaults.layout", "flat"])
        .assert()
        .success();

    pyscaff(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "defaults.layout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flat"));

    // Config defaults feed generation.
    pyscaff(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["new", "tools", "--yes"])
        .assert()
        .success();
    assert!(temp.path().join("tools/tools/__init__.py").is_file());
}

#[test]
fn test_env_overrides_config() {
    let temp = TempDir::new().unwrap();

    pyscaff(temp.path())
        .env("PYSCAFF_DEFAULTS__LAYOUT", "flat")
        .args(["new", "tools", "--yes"])
        .assert()
        .success();

    assert!(temp.path().join("tools/tools/__init__.py").is_file());
}
