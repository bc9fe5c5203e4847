//! CLI integration tests for leasehold
//!
//! Tests the leasehold CLI commands end-to-end against a temporary database
//! using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn leasehold_cmd(db_path: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("leasehold").unwrap();
    cmd.arg("--database").arg(db_path);
    cmd
}

#[test]
fn test_acquire_status_release_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("locks.db");

    leasehold_cmd(&db_path)
        .args(["acquire", "deploy", "--owner", "host-a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acquired 'deploy'"));

    leasehold_cmd(&db_path)
        .args(["status", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("owner=host-a"));

    leasehold_cmd(&db_path)
        .args(["release", "deploy", "--owner", "host-a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Released 'deploy'"));

    // Gone after release
    leasehold_cmd(&db_path)
        .args(["status", "deploy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No lock named 'deploy'"));
}

#[test]
fn test_acquire_held_lock_fails_with_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("locks.db");

    leasehold_cmd(&db_path)
        .args(["acquire", "deploy", "--owner", "host-a"])
        .assert()
        .success();

    leasehold_cmd(&db_path)
        .args(["acquire", "deploy", "--owner", "host-b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("held by another owner"));
}

#[test]
fn test_release_by_non_owner_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("locks.db");

    leasehold_cmd(&db_path)
        .args(["acquire", "deploy", "--owner", "host-a"])
        .assert()
        .success();

    leasehold_cmd(&db_path)
        .args(["release", "deploy", "--owner", "host-b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not hold it"));
}

#[test]
fn test_interrupt_flags_the_lock() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("locks.db");

    leasehold_cmd(&db_path)
        .args(["acquire", "reindex", "--owner", "host-a"])
        .assert()
        .success();

    leasehold_cmd(&db_path)
        .args(["interrupt", "reindex"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Interrupted 'reindex'"));

    leasehold_cmd(&db_path)
        .args(["status", "reindex"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[interrupted]"));
}

#[test]
fn test_interrupt_missing_lock_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("locks.db");

    leasehold_cmd(&db_path)
        .args(["interrupt", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such lock"));
}

#[test]
fn test_list_shows_all_locks_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("locks.db");

    leasehold_cmd(&db_path)
        .args(["acquire", "deploy", "--owner", "host-a"])
        .assert()
        .success();
    leasehold_cmd(&db_path)
        .args(["acquire", "reindex", "--owner", "host-b"])
        .assert()
        .success();

    leasehold_cmd(&db_path)
        .args(["--format", "json", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deploy\""))
        .stdout(predicate::str::contains("\"reindex\""))
        .stdout(predicate::str::contains("\"owned\""));
}

#[test]
fn test_sweep_reports_reclaimed_count() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("locks.db");

    leasehold_cmd(&db_path)
        .args(["acquire", "deploy", "--owner", "host-a"])
        .assert()
        .success();

    // Freshly renewed lease survives a sweep
    leasehold_cmd(&db_path)
        .args(["sweep", "--ttl-secs", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reclaimed 0 expired lease(s)"));

    // With a zero TTL everything is overdue
    leasehold_cmd(&db_path)
        .args(["sweep", "--ttl-secs", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reclaimed 1 expired lease(s)"));
}

#[test]
fn test_acquire_defaults_owner_to_hostname() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("locks.db");

    leasehold_cmd(&db_path)
        .args(["acquire", "deploy"])
        .assert()
        .success();

    // The same default identity renews rather than conflicting
    leasehold_cmd(&db_path)
        .args(["acquire", "deploy"])
        .assert()
        .success();
}
