//! Runs the `appcompare` binary against fixture studies.

mod common;

use assert_cmd::Command;
use common::StudyFixture;
use std::fs;
use tempfile::TempDir;

fn appcompare() -> Command {
    let mut cmd = Command::cargo_bin("appcompare").unwrap();
    cmd.env("APPCOMPARE_QUIET", "1").env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_analyze_writes_reports_and_summary() {
    let fixture = StudyFixture::camera_vs_internet();
    let output = appcompare()
        .args(["analyze", "--plain"])
        .arg(fixture.root())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("permissions_stats.txt"), "{stdout}");
    assert!(stdout.contains("sdk_stats.txt"));
    for report in ["sdk_stats.txt", "permissions_stats.txt", "components_stats.txt"] {
        assert!(fixture.figures().join(report).is_file(), "missing {report}");
    }
}

#[test]
fn test_figures_dir_override() {
    let fixture = StudyFixture::camera_vs_internet();
    let out = TempDir::new().unwrap();
    appcompare()
        .args(["analyze", "-q", "--only", "sdk", "--figures-dir"])
        .arg(out.path())
        .arg(fixture.root())
        .assert()
        .success();

    assert!(out.path().join("sdk_stats.txt").is_file());
    assert!(!out.path().join("permissions_stats.txt").exists());
    assert!(!fixture.figures().exists());
}

#[test]
fn test_analyze_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let output = appcompare()
        .arg("analyze")
        .arg(dir.path().join("nowhere"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_explicit_invalid_config_fails() {
    let fixture = StudyFixture::camera_vs_internet();
    fixture.write("custom.toml", "[analysis]\ntop_permissions = 0\n");
    appcompare()
        .args(["analyze", "-q", "--config"])
        .arg(fixture.root().join("custom.toml"))
        .arg(fixture.root())
        .assert()
        .failure();
}

#[test]
fn test_init_creates_config_once() {
    let dir = TempDir::new().unwrap();
    appcompare().current_dir(dir.path()).arg("init").assert().success();

    let contents = fs::read_to_string(dir.path().join(".appcompare.toml")).unwrap();
    assert!(contents.contains("[paths]"));
    assert!(contents.contains("top_permissions = 10"));

    appcompare().current_dir(dir.path()).arg("init").assert().failure();
    appcompare()
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}
