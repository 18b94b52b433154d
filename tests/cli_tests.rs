use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn clpctl(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("clpctl").unwrap();
    cmd.env_remove("CLP_HOME")
        .env_remove("RUST_LOG")
        .env("CLP_DOCKER_BIN", "/nonexistent/clpctl-test-docker")
        .arg("--home")
        .arg(home)
        .arg("--color")
        .arg("never");
    cmd
}

#[test]
fn help_lists_lifecycle_commands() {
    Command::cargo_bin("clpctl")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("stop"))
        .stdout(predicate::str::contains("compress"));
}

#[test]
fn version_is_printed() {
    Command::cargo_bin("clpctl")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn malformed_config_fails_with_diagnostic() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("bad.toml");
    fs::write(&config, "name = \"c1\"\npublish_ports = maybe\n").unwrap();

    clpctl(home.path())
        .arg("--config")
        .arg(&config)
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("publish_ports = maybe"));
}

#[test]
fn invalid_cluster_name_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("clp.toml");
    fs::write(&config, "name = \"-bad\"\n").unwrap();

    clpctl(home.path())
        .arg("--config")
        .arg(&config)
        .arg("stop")
        .assert()
        .failure()
        .stderr(predicate::str::contains("name"));
}

#[test]
fn missing_explicit_config_fails() {
    let home = tempfile::tempdir().unwrap();

    clpctl(home.path())
        .arg("--config")
        .arg(home.path().join("absent.toml"))
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn stop_without_container_runtime_fails() {
    let home = tempfile::tempdir().unwrap();

    clpctl(home.path())
        .arg("stop")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("clpctl-test-docker"));
}

#[test]
fn config_show_requires_an_initialized_cluster() {
    let home = tempfile::tempdir().unwrap();

    clpctl(home.path())
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has not been initialized"));
}

#[test]
fn json_errors_are_structured() {
    let home = tempfile::tempdir().unwrap();

    clpctl(home.path())
        .args(["--json", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""type":"error""#));
}
