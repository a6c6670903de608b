use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn taskbot() -> Command {
    Command::cargo_bin("taskbot").unwrap()
}

#[test]
fn creates_default_database_in_working_directory() {
    let temp = TempDir::new().unwrap();

    taskbot().current_dir(temp.path()).assert().success();
    assert!(temp.path().join("db.sqlite3").exists());

    // Second run finds the tables and leaves them alone
    taskbot().current_dir(temp.path()).assert().success();
}

#[test]
fn accepts_explicit_url() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bot.db");

    taskbot()
        .arg("--url")
        .arg(format!("sqlite:///{}", path.display()))
        .arg("--echo")
        .assert()
        .success();
    assert!(path.exists());
}

#[test]
fn fails_when_directory_is_missing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("bot.db");

    taskbot()
        .arg("--url")
        .arg(format!("sqlite:///{}", path.display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: failed to initialize"));
}

#[test]
fn rejects_in_memory_url() {
    taskbot()
        .args(["--url", "sqlite:///:memory:"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported database URL"));
}
