//! End-to-end tests for the clerk binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn clerk() -> Command {
    let mut cmd = Command::cargo_bin("clerk").unwrap();
    cmd.env_remove("CLERK_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, path: &str, content: &str) {
    let full = dir.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

#[test]
fn apply_writes_files_and_manifest() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write(source.path(), "conf/app.toml", "x = 1\n");

    clerk()
        .arg("apply")
        .arg(source.path())
        .arg("--into")
        .arg(target.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("conf/app.toml"));

    assert_eq!(
        fs::read_to_string(target.path().join("conf/app.toml")).unwrap(),
        "x = 1\n"
    );
    let manifest = fs::read_to_string(target.path().join("clerk.sum")).unwrap();
    assert!(manifest.starts_with("conf/app.toml "));
}

#[test]
fn second_apply_reports_up_to_date() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write(source.path(), "a.txt", "a");

    for _ in 0..2 {
        clerk()
            .args(["apply", "--no"])
            .arg(source.path())
            .arg("--into")
            .arg(target.path())
            .assert()
            .success();
    }

    clerk()
        .args(["apply", "--no"])
        .arg(source.path())
        .arg("--into")
        .arg(target.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date"));
}

#[test]
fn piped_answer_controls_overwrite() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write(source.path(), "a.txt", "v1");
    clerk()
        .arg("apply")
        .arg(source.path())
        .arg("--into")
        .arg(target.path())
        .assert()
        .success();

    write(target.path(), "a.txt", "local edit");
    write(source.path(), "a.txt", "v2");

    clerk()
        .arg("apply")
        .arg(source.path())
        .arg("--into")
        .arg(target.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("File 'a.txt' changed. Overwrite?"));
    assert_eq!(
        fs::read_to_string(target.path().join("a.txt")).unwrap(),
        "local edit"
    );

    clerk()
        .arg("apply")
        .arg(source.path())
        .arg("--into")
        .arg(target.path())
        .write_stdin("y\n")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(target.path().join("a.txt")).unwrap(), "v2");
}

#[test]
fn empty_stdin_denies() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write(source.path(), "a.txt", "generated");
    write(target.path(), "a.txt", "already here");

    clerk()
        .arg("apply")
        .arg(source.path())
        .arg("--into")
        .arg(target.path())
        .write_stdin("")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(target.path().join("a.txt")).unwrap(),
        "already here"
    );
}

#[test]
fn colliding_sources_fail() {
    let one = TempDir::new().unwrap();
    let two = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write(one.path(), "a/b.txt", "one");
    write(two.path(), "a/b.txt", "two");

    clerk()
        .arg("apply")
        .arg(one.path())
        .arg(two.path())
        .arg("--into")
        .arg(target.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("conflicts"));

    assert!(!target.path().join("a").exists());
    assert!(!target.path().join("clerk.sum").exists());
}

#[test]
fn config_file_drives_apply() {
    let root = TempDir::new().unwrap();
    write(root.path(), "templates/readme.md", "# hi\n");
    write(
        root.path(),
        "clerk.toml",
        "target = \"out\"\nsources = [\"templates\"]\non_drift = \"deny\"\n",
    );

    clerk()
        .arg("apply")
        .arg("--config")
        .arg(root.path().join("clerk.toml"))
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(root.path().join("out/readme.md")).unwrap(),
        "# hi\n"
    );
}

#[test]
fn plan_and_verify() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    write(source.path(), "a.txt", "a");

    clerk()
        .arg("plan")
        .arg(source.path())
        .arg("--into")
        .arg(target.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"));
    assert!(!target.path().join("a.txt").exists());

    clerk()
        .arg("apply")
        .arg(source.path())
        .arg("--into")
        .arg(target.path())
        .assert()
        .success();
    clerk().arg("verify").arg(target.path()).assert().success();

    write(target.path(), "a.txt", "edited");
    clerk()
        .arg("verify")
        .arg(target.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("modified"));
}

#[test]
fn no_sources_is_an_error() {
    clerk()
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No sources given"));
}
