//! Sequential fail-fast execution of named targets

use crate::broker::{self, BrokerMode};
use crate::errors::{DevError, Result};
use crate::manifest::TaskManifest;
use crate::runner::{Step, Target, TargetReport, TargetStatus};
use chrono::Utc;
use colored::Colorize;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

/// Heartbeat attempts granted to an external broker before giving up
const BROKER_PROBE_ATTEMPTS: u32 = 30;

/// Runs targets from a manifest, one step at a time.
///
/// Execution is strictly sequential: a target's `needs` run first (each
/// target at most once per invocation), then its own steps in order. The
/// first failing step halts the whole run and its exit code is surfaced
/// unchanged.
pub struct TaskRunner {
    root: PathBuf,
    manifest: TaskManifest,
    broker: Option<BrokerMode>,
}

impl TaskRunner {
    /// Create a runner rooted at the project directory
    pub fn new(root: PathBuf, manifest: TaskManifest) -> Self {
        Self {
            root,
            manifest,
            broker: None,
        }
    }

    /// Preset the broker mode, bypassing environment resolution and the
    /// external-broker readiness probe
    pub fn with_broker_mode(mut self, mode: BrokerMode) -> Self {
        self.broker = Some(mode);
        self
    }

    /// Run the named targets sequentially, fail-fast.
    ///
    /// Unknown names and composition cycles are rejected before any step
    /// runs. The summary is printed even when the run halts early.
    pub async fn run_targets<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<TargetReport>> {
        let order = self.manifest.execution_order(names)?;
        tracing::debug!(?order, "resolved execution order");

        let mut reports = Vec::new();
        for name in &order {
            let target = self
                .manifest
                .get(name)
                .ok_or_else(|| DevError::UnknownTarget(name.clone()))?
                .clone();

            let started_at = Utc::now();
            let timer = Instant::now();
            println!("[Runner] ▶ {} ({} steps)", target.name, target.steps.len());

            let outcome = self.run_steps(&target).await;
            reports.push(TargetReport {
                name: target.name.clone(),
                status: if outcome.is_ok() {
                    TargetStatus::Completed
                } else {
                    TargetStatus::Failed
                },
                started_at,
                elapsed: timer.elapsed(),
            });

            if let Err(e) = outcome {
                print_summary(&reports);
                return Err(e);
            }
        }

        print_summary(&reports);
        Ok(reports)
    }

    async fn run_steps(&mut self, target: &Target) -> Result<()> {
        for (index, step) in target.steps.iter().enumerate() {
            let args = self.resolve_args(step).await?;
            let cwd = self.resolve_cwd(step)?;

            if args.is_empty() {
                println!("[Runner]   $ {}", step.program);
            } else {
                println!("[Runner]   $ {} {}", step.program, args.join(" "));
            }

            let status = Command::new(&step.program)
                .args(&args)
                .envs(&step.env)
                .current_dir(&cwd)
                .status()
                .map_err(|e| DevError::Spawn(format!("{}: {}", step.program, e)))?;

            if !status.success() {
                // Signal-terminated children have no code; treat as generic failure
                let code = status.code().unwrap_or(1);
                eprintln!(
                    "[Runner] ✗ {} halted at step {} (exit code {})",
                    target.name,
                    index + 1,
                    code
                );
                return Err(DevError::StepFailed {
                    target: target.name.clone(),
                    step: index + 1,
                    code,
                });
            }
        }

        println!("[Runner] ✓ {} completed", target.name);
        Ok(())
    }

    /// Final argv for a step, with broker arguments appended when gated
    async fn resolve_args(&mut self, step: &Step) -> Result<Vec<String>> {
        let mut args = step.args.clone();
        if step.broker_gated {
            let mode = self.broker_mode().await?;
            args.extend(mode.pytest_args());
        }
        Ok(args)
    }

    fn resolve_cwd(&self, step: &Step) -> Result<PathBuf> {
        let cwd = match &step.cwd {
            Some(rel) => self.root.join(rel),
            None => self.root.clone(),
        };
        if !cwd.is_dir() {
            return Err(DevError::SuiteNotFound(cwd.display().to_string()));
        }
        Ok(cwd)
    }

    /// Resolve the broker mode once per run, probing external brokers
    async fn broker_mode(&mut self) -> Result<BrokerMode> {
        if let Some(mode) = &self.broker {
            return Ok(mode.clone());
        }

        let mode = BrokerMode::from_env()?;
        if let BrokerMode::External(url) = &mode {
            println!("[Broker] Waiting for external broker at {}", url);
            broker::wait_until_ready(url, BROKER_PROBE_ATTEMPTS).await?;
        }
        self.broker = Some(mode.clone());
        Ok(mode)
    }
}

/// Print the per-target run summary table
fn print_summary(reports: &[TargetReport]) {
    if reports.is_empty() {
        return;
    }

    println!();
    println!("[Runner] ═══════════════════════════════");
    println!("[Runner] Run Summary");
    println!("[Runner] ═══════════════════════════════");
    for report in reports {
        let status = match report.status {
            TargetStatus::Completed => "✓ ok".green(),
            TargetStatus::Failed => "✗ failed".red(),
        };
        println!(
            "[Runner] {:<16} {:<10} {:>7.1}s  (started {})",
            report.name,
            status,
            report.elapsed.as_secs_f64(),
            report.started_at.format("%H:%M:%S")
        );
    }
    println!();
}
