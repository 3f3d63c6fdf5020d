//! Integration tests for the snapflat binary.
//!
//! Only paths that end before the privilege check are exercised here, so the
//! binary never escalates or installs anything.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;

fn snapflat() -> Command {
    let mut cmd = Command::new(cargo_bin("snapflat"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    snapflat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--gnome-software"))
        .stdout(predicate::str::contains("--kde-discover"))
        .stdout(predicate::str::contains("--skip-update"));
    Ok(())
}

#[test]
fn cli_short_help() -> Result<(), Box<dyn std::error::Error>> {
    snapflat()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn cli_help_overrides_conflicting_flags() -> Result<(), Box<dyn std::error::Error>> {
    snapflat()
        .args(["--gnome-software", "--kde-discover", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-update"));
    Ok(())
}

#[test]
fn cli_help_overrides_unknown_flags() -> Result<(), Box<dyn std::error::Error>> {
    snapflat()
        .args(["--frobnicate", "-h"])
        .assert()
        .success();
    Ok(())
}

#[test]
fn cli_conflicting_stores_fail() -> Result<(), Box<dyn std::error::Error>> {
    snapflat()
        .args(["--gnome-software", "--kde-discover"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used together"));
    Ok(())
}

#[test]
fn cli_conflict_detected_in_any_order() -> Result<(), Box<dyn std::error::Error>> {
    snapflat()
        .args(["--kde-discover", "--skip-update", "--gnome-software"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used together"));
    Ok(())
}

#[test]
fn cli_unknown_flag_fails() -> Result<(), Box<dyn std::error::Error>> {
    snapflat()
        .arg("--frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--frobnicate"));
    Ok(())
}

#[test]
fn cli_positional_argument_fails() -> Result<(), Box<dyn std::error::Error>> {
    snapflat()
        .arg("install")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid arguments"));
    Ok(())
}

#[test]
fn cli_bare_double_dash_fails() -> Result<(), Box<dyn std::error::Error>> {
    snapflat()
        .args(["--skip-update", "--"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'--'"));
    Ok(())
}

#[test]
fn cli_errors_do_not_touch_stdout() -> Result<(), Box<dyn std::error::Error>> {
    snapflat()
        .arg("--bogus")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
    Ok(())
}
