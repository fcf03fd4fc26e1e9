//! Runner integration tests
//!
//! Drives TaskRunner end-to-end against temporary project trees with real
//! `/bin/sh` child processes. Uses tempfile for isolation.

use pactdev_core::{BrokerMode, DevError, Step, Target, TargetStatus, TaskManifest, TaskRunner};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sh(script: &str) -> Step {
    Step::new("sh", &["-c", script])
}

fn manifest_of(targets: Vec<Target>) -> TaskManifest {
    TaskManifest::from_targets(targets).unwrap()
}

fn read(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join(name)).unwrap()
}

#[tokio::test]
async fn test_pipeline_of_targets_runs_in_order() {
    let temp = TempDir::new().unwrap();
    let manifest = manifest_of(vec![
        Target::new("deps", "", vec![sh("echo deps >> pipeline.log")]),
        Target::new("test", "", vec![sh("echo test >> pipeline.log")]),
        Target::new("package", "", vec![sh("echo package >> pipeline.log")]),
        Target::composite("release", "", &["deps", "test", "package"]),
    ]);

    let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest);
    let reports = runner.run_targets(&["release"]).await.unwrap();

    assert_eq!(read(temp.path(), "pipeline.log"), "deps\ntest\npackage\n");
    assert_eq!(reports.len(), 4);
    assert!(reports.iter().all(|r| r.status == TargetStatus::Completed));
    assert_eq!(reports.last().unwrap().name, "release");
}

#[tokio::test]
async fn test_release_halts_when_tests_fail() {
    let temp = TempDir::new().unwrap();
    let manifest = manifest_of(vec![
        Target::new("deps", "", vec![sh("echo deps >> pipeline.log")]),
        Target::new("test", "", vec![sh("exit 2")]),
        Target::new("package", "", vec![sh("echo package >> pipeline.log")]),
        Target::composite("release", "", &["deps", "test", "package"]),
    ]);

    let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest);
    let err = runner.run_targets(&["release"]).await.unwrap_err();

    // deps ran, package never did
    assert_eq!(read(temp.path(), "pipeline.log"), "deps\n");
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_task_file_overlay_targets_are_runnable() {
    let temp = TempDir::new().unwrap();
    let overlay = r#"
apiVersion: pactfoundation/v1
kind: Tasks
metadata:
  name: local
spec:
  targets:
    marker:
      steps:
        - touch from-overlay
"#;
    fs::write(temp.path().join(".pacttasks"), overlay).unwrap();

    let manifest = TaskManifest::load(temp.path()).unwrap();
    let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest);
    runner.run_targets(&["marker"]).await.unwrap();

    assert!(temp.path().join("from-overlay").exists());
}

#[tokio::test]
async fn test_broker_gate_external_reaches_child_argv() {
    let temp = TempDir::new().unwrap();
    // `sh -c SCRIPT a b c` binds a to $0, b c to $@
    let manifest = manifest_of(vec![Target::new(
        "suite",
        "",
        vec![sh("printf '%s\\n' \"$0\" \"$@\" > args.out").broker_gated()],
    )]);

    let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest)
        .with_broker_mode(BrokerMode::External("http://broker:9292".to_string()));
    runner.run_targets(&["suite"]).await.unwrap();

    let args = read(temp.path(), "args.out");
    assert_eq!(args, "--no-run-broker\n--broker-url=http://broker:9292\n");
}

#[tokio::test]
async fn test_broker_gate_managed_adds_nothing() {
    let temp = TempDir::new().unwrap();
    let manifest = manifest_of(vec![Target::new(
        "suite",
        "",
        vec![sh("printf '%s' \"$#\" > argc.out").broker_gated()],
    )]);

    let mut runner =
        TaskRunner::new(temp.path().to_path_buf(), manifest).with_broker_mode(BrokerMode::Managed);
    runner.run_targets(&["suite"]).await.unwrap();

    assert_eq!(read(temp.path(), "argc.out"), "0");
}

#[tokio::test]
async fn test_steps_run_in_their_directory() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("examples/consumer")).unwrap();
    let manifest = manifest_of(vec![Target::new(
        "suite",
        "",
        vec![sh("touch here").in_dir("examples/consumer")],
    )]);

    let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest);
    runner.run_targets(&["suite"]).await.unwrap();

    assert!(temp.path().join("examples/consumer/here").exists());
    assert!(!temp.path().join("here").exists());
}

#[tokio::test]
async fn test_reports_cover_failed_target() {
    let temp = TempDir::new().unwrap();
    let manifest = manifest_of(vec![
        Target::new("ok", "", vec![sh("true")]),
        Target {
            name: "broken".to_string(),
            description: String::new(),
            needs: vec!["ok".to_string()],
            steps: vec![sh("exit 5")],
        },
    ]);

    let mut runner = TaskRunner::new(temp.path().to_path_buf(), manifest);
    let err = runner.run_targets(&["broken"]).await.unwrap_err();

    match err {
        DevError::StepFailed { target, code, .. } => {
            assert_eq!(target, "broken");
            assert_eq!(code, 5);
        }
        other => panic!("Expected StepFailed, got {:?}", other),
    }
}
