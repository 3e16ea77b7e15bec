//! End-to-end checks of the `anstoss` binary against a temporary data dir.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;

fn anstoss(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("anstoss").unwrap_or_else(|e| panic!("binary missing: {e}"));
    cmd.env_remove("ANSTOSS_EPSILON")
        .env_remove("ANSTOSS_ALPHA")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output)
        .unwrap_or_else(|e| panic!("stdout is not JSON: {e}: {}", String::from_utf8_lossy(&output)))
}

#[test]
fn suggest_bootstraps_and_exploits_first_seed() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let data = dir.path().join("data");

    let choice = json_stdout(anstoss(&data).args(["suggest", "--epsilon", "0"]));

    assert_eq!(choice["suggestion_id"], "SUG-1");
    assert_eq!(choice["strategy"], "exploit");
    assert!(data.join("weights.json").exists());
}

#[test]
fn accept_and_reject_move_the_weight() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let data = dir.path();

    let record = json_stdout(anstoss(data).args(["accept", "SUG-2", "--context", "planning"]));
    assert_eq!(record["suggestion_id"], "SUG-2");
    assert_eq!(record["previous_weight"], 0.0);
    assert_eq!(record["new_weight"], 0.1);
    assert_eq!(record["reward"], 1);

    let table = json_stdout(anstoss(data).arg("weights"));
    assert_eq!(table[1]["suggestion_id"], "SUG-2");
    assert_eq!(table[1]["weight"], 0.1);

    let record = json_stdout(anstoss(data).args(["reject", "SUG-2"]));
    assert_eq!(record["new_weight"], 0.0);

    let feedback = json_stdout(anstoss(data).arg("feedback"));
    assert_eq!(feedback.as_array().map(Vec::len), Some(2));
    assert_eq!(feedback[0]["user_context_text"], "planning");
    assert_eq!(
        feedback[0]["suggestion_text"],
        "Plan tomorrow's top 3 tasks tonight."
    );
}

#[test]
fn unknown_id_prints_null_and_logs_no_improvement() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let data = dir.path();

    anstoss(data)
        .args(["accept", "NOT-A-REAL-ID"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("null"));

    let improvements = json_stdout(anstoss(data).arg("improvements"));
    assert_eq!(improvements.as_array().map(Vec::len), Some(0));
    let feedback = json_stdout(anstoss(data).arg("feedback"));
    assert_eq!(feedback.as_array().map(Vec::len), Some(1));
}

#[test]
fn tail_limits_log_output() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let data = dir.path();
    for id in ["SUG-1", "SUG-2", "SUG-3"] {
        anstoss(data).args(["accept", id]).assert().success();
    }

    let last = json_stdout(anstoss(data).args(["improvements", "--tail", "1"]));

    assert_eq!(last.as_array().map(Vec::len), Some(1));
    assert_eq!(last[0]["suggestion_id"], "SUG-3");
}

#[test]
fn stats_count_templates_and_feedback() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let data = dir.path();
    anstoss(data).args(["accept", "SUG-1"]).assert().success();
    anstoss(data).args(["reject", "SUG-3"]).assert().success();

    let stats = json_stdout(anstoss(data).arg("stats"));

    assert_eq!(stats["templates"], 3);
    assert_eq!(stats["improvements"], 2);
    assert_eq!(stats["feedback"]["accepted"], 1);
    assert_eq!(stats["by_suggestion"]["SUG-3"]["rejected"], 1);
}

#[test]
fn empty_table_suggests_null() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let data = dir.path();
    fs::write(data.join("weights.json"), "[]").unwrap_or_else(|e| panic!("write: {e}"));

    anstoss(data)
        .arg("suggest")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("null"));
}

#[test]
fn unwritable_data_dir_fails_with_context() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let blocker = dir.path().join("blocked");
    fs::write(&blocker, b"not a directory").unwrap_or_else(|e| panic!("write: {e}"));

    anstoss(&blocker)
        .arg("suggest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to choose a suggestion"));
}
