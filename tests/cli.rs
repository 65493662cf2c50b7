// ABOUTME: Integration tests for the stable-galaxy CLI commands.
// ABOUTME: Validates --help output, init behavior, and failure exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn galaxy_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("stable-galaxy"));
    for var in [
        "ROLLBACK_BACKEND",
        "ROLLBACK_FROM_VERSION",
        "ROLLBACK_KNOWN_VERSIONS",
        "DOCKER_SERVICE_NAME",
        "K8S_DEPLOYMENT",
        "STABLE_GALAXY_CONFIG",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_shows_commands() {
    galaxy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rollback"))
        .stdout(predicate::str::contains("current"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn rollback_help_lists_flags() {
    galaxy_cmd()
        .args(["rollback", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--max-attempts"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("stable-galaxy.yml");

    galaxy_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--service", "checkout"])
        .assert()
        .success();

    assert!(config_path.exists(), "stable-galaxy.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("service: checkout"));
    assert!(content.contains("max_attempts: 3"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("stable-galaxy.yml");

    fs::write(&config_path, "dry_run: true\n").unwrap();

    galaxy_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn rollback_without_backend_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    galaxy_cmd()
        .current_dir(temp_dir.path())
        .args(["rollback", "--from", "v2", "--version", "v1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no backend configured"));
}

#[test]
fn dry_run_rollback_succeeds_without_docker() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("stable-galaxy.yml"),
        "backend:\n  type: docker\n  service: web\nretry:\n  backoff: 0s\n",
    )
    .unwrap();

    galaxy_cmd()
        .current_dir(temp_dir.path())
        .args([
            "--json",
            "rollback",
            "--dry-run",
            "--from",
            "v1.2.0",
            "--version",
            "v1.0.0",
            "--version",
            "v1.1.0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":"rollback""#))
        .stdout(predicate::str::contains(r#""to_version":"v1.1.0""#))
        .stdout(predicate::str::contains(r#""dry_run":true"#));
}

#[test]
fn no_stable_version_exits_with_validation_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("stable-galaxy.yml"),
        "backend:\n  type: docker\n  service: web\n",
    )
    .unwrap();

    galaxy_cmd()
        .current_dir(temp_dir.path())
        .args(["rollback", "--dry-run", "--from", "v1.0.0", "--version", "v1.0.0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ValidationError"));
}

#[test]
fn invalid_env_value_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    galaxy_cmd()
        .current_dir(temp_dir.path())
        .env("ROLLBACK_DRY_RUN", "sometimes")
        .arg("current")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ROLLBACK_DRY_RUN"));
}
