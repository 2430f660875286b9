use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn schola() -> Command {
    let mut cmd = Command::cargo_bin("schola").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

const SMALL: [&str; 10] = [
    "--classrooms",
    "2",
    "--students-per-classroom",
    "3",
    "--quorum",
    "2",
    "--lessons",
    "2",
    "--wait-ms",
    "5",
];

#[test]
fn test_run_prints_summary() {
    schola()
        .arg("run")
        .args(SMALL)
        .args(["--lesson-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("===== Simulation Summary ====="))
        .stdout(predicate::str::contains("Lesson attendance distribution:"))
        .stdout(predicate::str::contains("Classroom 1:"));
}

#[test]
fn test_run_json_reports_population() {
    let output = schola()
        .arg("run")
        .args(SMALL)
        .args(["--lesson-ms", "0", "--json", "--verify"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let line = stdout.lines().next().unwrap();
    let report: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(report["run"], 1);
    assert_eq!(report["summary"]["students_total"], 6);
    assert_eq!(report["summary"]["teachers_total"], 2);
    assert!(report["journal"]["lessons"].as_u64().is_some());
}

#[test]
fn test_repeated_runs_print_aggregate() {
    schola()
        .arg("run")
        .args(SMALL)
        .args(["--lesson-ms", "0", "--runs", "2", "--verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run 2/2"))
        .stdout(predicate::str::contains("Journal verified:"))
        .stdout(predicate::str::contains("runs fully completed"));
}

#[test]
fn test_invalid_quorum_fails() {
    schola()
        .arg("run")
        .args(["--classrooms", "1", "--students-per-classroom", "2", "--quorum", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quorum"));
}

#[test]
fn test_zero_runs_fails() {
    schola()
        .args(["run", "--runs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--runs"));
}

#[test]
fn test_unattainable_quota_warns() {
    schola()
        .args([
            "run",
            "--classrooms",
            "2",
            "--students-per-classroom",
            "2",
            "--quorum",
            "1",
            "--lessons",
            "3",
            "--lesson-ms",
            "0",
            "--wait-ms",
            "5",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("students can never complete"))
        .stdout(predicate::str::contains("Students who completed all lessons: 0/4"));
}

#[test]
fn test_check_config_accepts_valid_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("school.toml");
    fs::write(&path, "classrooms = 4\nquorum = 4\n").unwrap();

    schola()
        .arg("check-config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("classrooms = 4"))
        .stdout(predicate::str::contains("students_per_classroom = 20"));
}

#[test]
fn test_check_config_rejects_unknown_field() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("school.toml");
    fs::write(&path, "classes = 4\n").unwrap();

    schola()
        .arg("check-config")
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_check_config_missing_file() {
    schola()
        .args(["check-config", "--config", "/nonexistent/school.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read configuration file"));
}

#[test]
fn test_unknown_log_level_rejected() {
    schola()
        .args(["--log-level", "loud", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown log level"));
}
