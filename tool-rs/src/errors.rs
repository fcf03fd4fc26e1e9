//! Error types for pact-dev-rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevError {
    #[error("{0}")]
    Usage(String),

    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    #[error("Target cycle detected: {0}")]
    TargetCycle(String),

    #[error("Target '{target}' failed at step {step}: exit code {code}")]
    StepFailed {
        target: String,
        step: usize,
        code: i32,
    },

    #[error("{context} exited with code {code}")]
    ChildExit { context: String, code: i32 },

    #[error("Failed to spawn process: {0}")]
    Spawn(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Broker error: {0}")]
    Broker(String),

    #[error("Docker error: {0}")]
    Docker(String),

    #[error("Suite not found: {0}")]
    SuiteNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DevError {
    /// Exit code the process should surface for this error.
    ///
    /// Failures of child processes (task steps, docker build/run) propagate
    /// the child's exit code; everything else is a usage-class failure and
    /// exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            DevError::StepFailed { code, .. } => *code,
            DevError::ChildExit { code, .. } => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DevError>;
