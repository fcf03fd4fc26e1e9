//! Task runner for the pact-python development pipeline
//!
//! Provides the Makefile-equivalent execution core:
//! - `Step`: one child-process invocation (program, argv, cwd, env)
//! - `Target`: a named, ordered list of steps plus simple composition
//!   (`needs` run other targets sequentially beforehand)
//! - `TaskRunner`: sequential, fail-fast execution with exit-code
//!   propagation and a per-target summary
//!
//! There is no dependency-graph evaluation beyond `needs`, no parallelism,
//! and no retry: the first failing step halts the run and its exit code
//! becomes the process exit code.

pub mod executor;

pub use executor::TaskRunner;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// One child-process invocation within a target.
///
/// Steps carry a literal argv; no shell is involved, so no quoting or
/// variable expansion applies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    /// Program to invoke (resolved via PATH)
    pub program: String,
    /// Arguments passed verbatim
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    /// Extra environment variables for this step only
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    /// Whether the final argv depends on the broker mode (pytest suites)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub broker_gated: bool,
}

impl Step {
    /// Create a step from a program and argument list
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: None,
            env: BTreeMap::new(),
            broker_gated: false,
        }
    }

    /// Run the step inside `dir` (relative to the project root)
    pub fn in_dir(mut self, dir: &str) -> Self {
        self.cwd = Some(PathBuf::from(dir));
        self
    }

    /// Add an environment variable for this step
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Mark the step's argv as depending on the broker mode
    pub fn broker_gated(mut self) -> Self {
        self.broker_gated = true;
        self
    }

    /// Human-readable command line for progress output
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// A named, ordered list of steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Targets run sequentially before this one's own steps
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

impl Target {
    /// Create a target with steps only
    pub fn new(name: &str, description: &str, steps: Vec<Step>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            needs: Vec::new(),
            steps,
        }
    }

    /// Create a composite target: other targets run in order, no own steps
    pub fn composite(name: &str, description: &str, needs: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            needs: needs.iter().map(|n| n.to_string()).collect(),
            steps: Vec::new(),
        }
    }
}

/// Outcome of one executed target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TargetStatus {
    Completed,
    Failed,
}

/// Execution record for one target in a run
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub name: String,
    pub status: TargetStatus,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}
