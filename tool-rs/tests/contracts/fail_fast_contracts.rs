// Fail-Fast Contract Tests
//
// A target either completes all of its steps or stops at the first failing
// step and surfaces that step's exit code. There is no retry, no rollback
// and no "keep going" mode. These tests pin that behavior with real child
// processes.

use pactdev_core::{Step, Target, TargetStatus, TaskManifest, TaskRunner};
use tempfile::TempDir;

fn sh(script: &str) -> Step {
    Step::new("sh", &["-c", script])
}

/// WHY: A 3-step target whose second step fails must run step 1, skip step
/// 3 and exit with step 2's code.
/// BREAKS: Release safety; a failing test step must never be followed by a
/// package step.
#[tokio::test]
async fn three_step_target_halts_after_first_failure() {
    let temp = TempDir::new().unwrap();
    let manifest = TaskManifest::from_targets(vec![Target::new(
        "pipeline",
        "",
        vec![sh("touch step1"), sh("exit 42"), sh("touch step3")],
    )])
    .unwrap();

    let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest);
    let err = runner.run_targets(&["pipeline"]).await.unwrap_err();

    assert!(temp.path().join("step1").exists(), "step 1 must have run");
    assert!(!temp.path().join("step3").exists(), "step 3 must not run");
    assert_eq!(err.exit_code(), 42, "step 2's exit code must propagate");
}

/// WHY: Exit codes propagate verbatim, not normalized to 1. Callers branch
/// on specific codes (pytest distinguishes "tests failed" from "no tests
/// collected").
/// BREAKS: Any wrapper that inspects the exit code.
#[tokio::test]
async fn exit_codes_propagate_verbatim() {
    for code in [1, 2, 5, 77] {
        let temp = TempDir::new().unwrap();
        let manifest = TaskManifest::from_targets(vec![Target::new(
            "failing",
            "",
            vec![sh(&format!("exit {}", code))],
        )])
        .unwrap();

        let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest);
        let err = runner.run_targets(&["failing"]).await.unwrap_err();
        assert_eq!(err.exit_code(), code);
    }
}

/// WHY: Composition is sequential: a failing prerequisite stops the whole
/// chain before the dependent target starts.
/// BREAKS: `release` running `package` after `test` failed.
#[tokio::test]
async fn failing_prerequisite_stops_the_chain() {
    let temp = TempDir::new().unwrap();
    let manifest = TaskManifest::from_targets(vec![
        Target::new("check", "", vec![sh("exit 3")]),
        Target {
            name: "ship".to_string(),
            description: String::new(),
            needs: vec!["check".to_string()],
            steps: vec![sh("touch shipped")],
        },
    ])
    .unwrap();

    let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest);
    let err = runner.run_targets(&["ship"]).await.unwrap_err();

    assert!(!temp.path().join("shipped").exists());
    assert_eq!(err.exit_code(), 3);
}

/// WHY: Name resolution happens before execution. A typo in the second of
/// two requested targets must not leave the first half-run.
/// BREAKS: Idempotence expectations of interactive use.
#[tokio::test]
async fn unknown_name_anywhere_means_nothing_runs() {
    let temp = TempDir::new().unwrap();
    let manifest = TaskManifest::from_targets(vec![Target::new(
        "real",
        "",
        vec![sh("touch ran")],
    )])
    .unwrap();

    let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest);
    let err = runner.run_targets(&["real", "tpyo"]).await.unwrap_err();

    assert!(!temp.path().join("ran").exists());
    assert_eq!(err.exit_code(), 1);
}

/// WHY: A successful run reports every executed target as completed, in
/// execution order; automation reads the report instead of parsing output.
/// BREAKS: Downstream tooling consuming TargetReport.
#[tokio::test]
async fn successful_run_reports_execution_order() {
    let temp = TempDir::new().unwrap();
    let manifest = TaskManifest::from_targets(vec![
        Target::new("first", "", vec![sh("true")]),
        Target::new("second", "", vec![sh("true")]),
    ])
    .unwrap();

    let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest);
    let reports = runner.run_targets(&["first", "second"]).await.unwrap();

    let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert!(reports.iter().all(|r| r.status == TargetStatus::Completed));
}
