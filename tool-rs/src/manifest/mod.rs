//! Named-target registry
//!
//! The built-in table mirrors the pact-python Makefile (`deps`, `clean`,
//! `test`, `package`, `release`, `venv`, one target per example suite and
//! the `examples` composite). A `.pacttasks` YAML file in the project root
//! may add targets or override built-in ones.
//!
//! Format:
//! ```yaml
//! apiVersion: pactfoundation/v1
//! kind: Tasks
//! metadata:
//!   name: pact-python
//! spec:
//!   targets:
//!     smoke:
//!       description: quick sanity run
//!       steps:
//!         - pip install -e .
//!         - run: pytest
//!           cwd: examples/consumer
//!           brokerGated: true
//!     nightly:
//!       needs: [smoke, examples]
//! ```

pub mod builtin;

use crate::errors::{DevError, Result};
use crate::runner::{Step, Target};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Task file name looked up in the project root
pub const TASK_FILE_NAME: &str = ".pacttasks";

/// apiVersion accepted in a task file
pub const TASK_FILE_API_VERSION: &str = "pactfoundation/v1";

/// kind accepted in a task file
pub const TASK_FILE_KIND: &str = "Tasks";

static TARGET_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]*$").expect("target name pattern compiles"));

/// Full named-target table for one project.
#[derive(Debug, Clone)]
pub struct TaskManifest {
    targets: BTreeMap<String, Target>,
}

impl TaskManifest {
    /// Build a manifest from a target list, rejecting duplicates and
    /// validating the result
    pub fn from_targets(targets: Vec<Target>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for target in targets {
            let name = target.name.clone();
            if map.insert(name.clone(), target).is_some() {
                return Err(DevError::Manifest(format!("Duplicate target: '{}'", name)));
            }
        }

        let manifest = Self { targets: map };
        manifest.validate()?;
        Ok(manifest)
    }

    /// The built-in Makefile-equivalent table
    pub fn builtin() -> Self {
        builtin::table().clone()
    }

    /// Built-in table plus the project's `.pacttasks` overlay, if present.
    ///
    /// Overlay targets replace built-in targets of the same name.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        let mut manifest = Self::builtin();

        let path = root.as_ref().join(TASK_FILE_NAME);
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading task file overlay");
            let file = TaskFile::load(&path)?;
            for target in file.into_targets()? {
                manifest.targets.insert(target.name.clone(), target);
            }
            manifest.validate()?;
        }

        Ok(manifest)
    }

    /// Look up a target by name
    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    /// All targets in name order
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Resolve the execution order for the requested targets.
    ///
    /// `needs` are placed before their dependents, depth-first in
    /// declaration order; each target appears at most once. Unknown names
    /// are rejected before anything else so a run never starts partially.
    pub fn execution_order<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<String>> {
        for name in requested {
            if !self.targets.contains_key(name.as_ref()) {
                return Err(DevError::UnknownTarget(name.as_ref().to_string()));
            }
        }

        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut trail = Vec::new();
        for name in requested {
            self.visit(name.as_ref(), &mut visited, &mut trail, &mut order)?;
        }
        Ok(order)
    }

    /// Validate the whole table: legal names, resolvable `needs`, no
    /// cycles, no empty targets
    pub fn validate(&self) -> Result<()> {
        for (name, target) in &self.targets {
            if !TARGET_NAME_RE.is_match(name) {
                return Err(DevError::Validation(format!(
                    "Illegal target name: '{}'",
                    name
                )));
            }
            if target.steps.is_empty() && target.needs.is_empty() {
                return Err(DevError::Validation(format!(
                    "Target '{}' has neither steps nor needs",
                    name
                )));
            }
            for need in &target.needs {
                if !self.targets.contains_key(need) {
                    return Err(DevError::Validation(format!(
                        "Target '{}' needs unknown target '{}'",
                        name, need
                    )));
                }
            }
        }

        // A full traversal surfaces composition cycles
        let all: Vec<&str> = self.targets.keys().map(|k| k.as_str()).collect();
        self.execution_order(&all)?;
        Ok(())
    }

    fn visit(
        &self,
        name: &str,
        visited: &mut HashSet<String>,
        trail: &mut Vec<String>,
        order: &mut Vec<String>,
    ) -> Result<()> {
        if visited.contains(name) {
            return Ok(());
        }
        if trail.iter().any(|t| t == name) {
            let mut cycle = trail.clone();
            cycle.push(name.to_string());
            return Err(DevError::TargetCycle(cycle.join(" -> ")));
        }

        let target = self
            .targets
            .get(name)
            .ok_or_else(|| DevError::UnknownTarget(name.to_string()))?;

        trail.push(name.to_string());
        for need in &target.needs {
            self.visit(need, visited, trail, order)?;
        }
        trail.pop();

        visited.insert(name.to_string());
        order.push(name.to_string());
        Ok(())
    }
}

/// `.pacttasks` file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskFile {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: TaskFileSpec,
}

/// Task file metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub name: String,
}

/// Task file specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskFileSpec {
    pub targets: BTreeMap<String, TargetSpec>,
}

/// One target entry in a task file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub needs: Vec<String>,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

/// A step in a task file: either a bare command line or a detailed entry.
///
/// Command lines are split on whitespace into an argv; no shell is
/// involved, so quoting and expansion do not apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StepSpec {
    Command(String),
    Detailed(DetailedStep),
}

/// Detailed step entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetailedStep {
    pub run: String,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub broker_gated: bool,
}

impl TaskFile {
    /// Load a task file from the given path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DevError::Manifest(format!(
                "Task file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| DevError::Manifest(format!("Failed to read {}: {}", TASK_FILE_NAME, e)))?;

        let file: TaskFile = serde_yaml::from_str(&content)
            .map_err(|e| DevError::Manifest(format!("Invalid {} YAML: {}", TASK_FILE_NAME, e)))?;

        file.validate()?;
        Ok(file)
    }

    /// Validate the task file envelope
    pub fn validate(&self) -> Result<()> {
        if self.api_version != TASK_FILE_API_VERSION {
            return Err(DevError::Validation(format!(
                "Invalid apiVersion: expected '{}', got '{}'",
                TASK_FILE_API_VERSION, self.api_version
            )));
        }

        if self.kind != TASK_FILE_KIND {
            return Err(DevError::Validation(format!(
                "Invalid kind: expected '{}', got '{}'",
                TASK_FILE_KIND, self.kind
            )));
        }

        if self.metadata.name.is_empty() {
            return Err(DevError::Validation(
                "metadata.name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Convert the file's target entries into runner targets
    pub fn into_targets(self) -> Result<Vec<Target>> {
        self.spec
            .targets
            .into_iter()
            .map(|(name, spec)| spec.into_target(name))
            .collect()
    }
}

impl TargetSpec {
    fn into_target(self, name: String) -> Result<Target> {
        let steps = self
            .steps
            .into_iter()
            .map(|s| s.into_step(&name))
            .collect::<Result<Vec<Step>>>()?;

        Ok(Target {
            name,
            description: self.description,
            needs: self.needs,
            steps,
        })
    }
}

impl StepSpec {
    fn into_step(self, target: &str) -> Result<Step> {
        match self {
            StepSpec::Command(line) => {
                let (program, args) = split_command(&line, target)?;
                Ok(Step {
                    program,
                    args,
                    cwd: None,
                    env: BTreeMap::new(),
                    broker_gated: false,
                })
            }
            StepSpec::Detailed(detailed) => {
                let (program, args) = split_command(&detailed.run, target)?;
                Ok(Step {
                    program,
                    args,
                    cwd: detailed.cwd,
                    env: detailed.env,
                    broker_gated: detailed.broker_gated,
                })
            }
        }
    }
}

fn split_command(line: &str, target: &str) -> Result<(String, Vec<String>)> {
    let mut parts = line.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| DevError::Validation(format!("Empty step command in target '{}'", target)))?;
    Ok((
        program.to_string(),
        parts.map(|p| p.to_string()).collect(),
    ))
}
