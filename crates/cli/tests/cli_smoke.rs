use assert_cmd::Command;

#[test]
fn prints_help() {
    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Mediadex"));
}

#[test]
fn index_help() {
    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.args(["index", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Index a directory"));
}

#[test]
fn status_help() {
    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.args(["status", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Show index status"));
}

#[test]
fn config_prints_template() {
    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.arg("config")
        .assert()
        .success()
        .stdout(predicates::str::contains("[tools]"));
}

#[test]
fn invalid_command_fails() {
    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.arg("foo").assert().failure();
}

#[test]
fn index_of_missing_root_fails() {
    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.args(["index", "/definitely/not/a/real/dir"])
        .assert()
        .failure();
}
