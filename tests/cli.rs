//! Command-line behavior of the `flext` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

mod common;

fn flext(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flext"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn root_arg(dir: &Path) -> String {
    dir.to_string_lossy().into_owned()
}

#[test]
fn test_routes_prints_table() {
    let dir = TempDir::new().unwrap();
    common::write_handler(dir.path(), "api/users/get.toml", "[response]\n");
    common::write_handler(dir.path(), "api/users/post.toml", "[response]\n");

    let output = flext(&["routes", "--root", &root_arg(dir.path())]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("/api/users"), "{out}");
    assert!(out.contains("users_get"), "{out}");
    assert!(out.contains("users_post"), "{out}");
}

#[test]
fn test_routes_reports_missing_api_dir() {
    let dir = TempDir::new().unwrap();

    let output = flext(&["routes", "--root", &root_arg(dir.path())]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("API directory not found"), "{out}");
    assert!(out.contains("No handlers found"), "{out}");
}

#[test]
fn test_debug_logs_routes_below_configured_level() {
    let dir = TempDir::new().unwrap();
    common::write_handler(dir.path(), "api/hello/get.toml", "[response]\nbody = \"hi\"\n");
    let config = dir.path().join("flext.toml");
    fs::write(&config, "[observability]\nlog_level = \"warn\"\n").unwrap();
    let config = root_arg(&config);
    let root = root_arg(dir.path());

    let quiet = flext(&["--config", &config, "check", "--root", &root]);
    assert!(quiet.status.success());
    assert!(!stdout(&quiet).contains("Registering route"));

    let loud = flext(&["--config", &config, "check", "--root", &root, "--debug"]);
    assert!(loud.status.success());
    let out = stdout(&loud);
    assert!(out.contains("Registering route"), "{out}");
    assert!(out.contains("/api/hello"), "{out}");
}

#[test]
fn test_check_fails_on_broken_handler() {
    let dir = TempDir::new().unwrap();
    common::write_handler(dir.path(), "api/get.toml", "[response\n");

    let output = flext(&["check", "--root", &root_arg(dir.path())]);
    assert!(!output.status.success());
}
