// Export formats: CSV, JSON and HTML, to stdout and to files
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn scenario_cmd() -> Command {
    let mut cmd = Command::cargo_bin("qpcr-optimizer").unwrap();
    cmd.args(["--control-labels", "A,B", "--control-values", "1.0,0.9"])
        .args(["-c", "C1:X,Y:1.2,0.8"]);
    cmd
}

#[test]
fn test_csv_output() {
    scenario_cmd()
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "condition,rank,mapping,mean,sd,transformed,diffs\n",
        ))
        .stdout(predicate::str::contains(
            "C1,1,\"X→A, Y→B\",",
        ))
        .stdout(predicate::str::contains("87.055056;107.177346,0.2000;-0.1000"));
}

#[test]
fn test_csv_precision_options() {
    scenario_cmd()
        .args(["--format", "csv", "--diffs-precision", "2", "--transformed-precision", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("87.1;107.2,0.20;-0.10"));
}

#[test]
fn test_csv_written_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("results.csv");

    scenario_cmd()
        .args(["--format", "csv", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(content.lines().nth(2).unwrap().starts_with("C1,2,"));
}

#[test]
fn test_json_output() {
    let output = scenario_cmd().args(["--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["format"], "qpcr-optimizer-json-v1");
    assert_eq!(json["conditions"][0]["name"], "C1");
    assert_eq!(json["conditions"][0]["total_candidates"], 2);
    assert_eq!(json["conditions"][0]["candidates"][0]["rank"], 1);
    assert_eq!(
        json["conditions"][0]["candidates"][0]["permutation"],
        serde_json::json!([0, 1])
    );
    assert_eq!(json["fingerprint"].as_str().unwrap().len(), 64);
}

#[test]
fn test_json_fingerprint_stable_across_runs_and_jobs() {
    let fingerprint = |extra: &[&str]| {
        let output = scenario_cmd()
            .args(["--format", "json"])
            .args(extra)
            .output()
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["fingerprint"].as_str().unwrap().to_string()
    };

    let first = fingerprint(&[]);
    assert_eq!(first, fingerprint(&[]));
    assert_eq!(first, fingerprint(&["--jobs", "2"]));
}

#[test]
fn test_html_output() {
    scenario_cmd()
        .args(["--format", "html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("qPCR Pairing Report"))
        .stdout(predicate::str::contains("X→A, Y→B"));
}

#[test]
fn test_all_flag_reports_every_pairing() {
    Command::cargo_bin("qpcr-optimizer")
        .unwrap()
        .args(["--control-labels", "A,B,C,D", "--control-values", "1.0,0.9,1.1,1.0"])
        .args(["-c", "C1:W,X,Y,Z:1.2,0.8,1.0,1.1", "--all", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| out.lines().count() == 25));
}
