use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

// Plain-text files go through pure-Rust extraction, so these runs need no
// external engines installed.

#[test]
fn cli_e2e_index_then_status() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("file.txt"), "lease agreement security deposit").unwrap();

    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.args(["index", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("[OK] file.txt"))
        .stdout(contains("done: 1 new entries (0 errors), 1 total"));

    let index = fs::read_to_string(dir.path().join("index.json")).unwrap();
    assert!(index.contains("file.txt"));
    assert!(index.contains("lease agreement security deposit"));

    let log = fs::read_to_string(dir.path().join("ocr_log.txt")).unwrap();
    assert_eq!(log.lines().count(), 1);

    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.args(["status", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("entries: 1"))
        .stdout(contains("txt: 1"));
}

#[test]
fn cli_e2e_second_run_adds_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.md"), "# notes").unwrap();

    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.args(["index", dir.path().to_str().unwrap()])
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.args(["index", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("resume: 1 files, 0 video frames already indexed"))
        .stdout(contains("done: 0 new entries (0 errors), 1 total"));
}

#[test]
fn cli_e2e_empty_directory() {
    let dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.args(["index", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("done: 0 new entries (0 errors), 0 total"));

    let index = fs::read_to_string(dir.path().join("index.json")).unwrap();
    assert_eq!(index.trim(), "[]");
    let log = fs::read_to_string(dir.path().join("ocr_log.txt")).unwrap();
    assert!(log.is_empty());
}

#[test]
fn cli_e2e_malformed_index_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.json"), "{ broken").unwrap();
    fs::write(dir.path().join("file.txt"), "content").unwrap();

    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.args(["index", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("malformed index file"));
}
