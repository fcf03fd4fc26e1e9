//! # pactdev Core - pact-python Development Tooling
//!
//! Rust implementation of the pact-python development pipeline: the
//! Makefile targets, the container test-matrix helpers and the broker
//! switch for the example suites, exposed as one CLI (`pactdev`).
//!
//! ## Core Principle
//!
//! **Every command is a fixed, ordered list of child processes**: a target
//! either completes all of its steps and exits 0, or halts at the first
//! failing step and surfaces that step's exit code unchanged. There are no
//! retries, no rollback and no parallelism.
//!
//! ## Key Features
//!
//! - Named targets mirroring the Makefile (`deps`, `test`, `package`,
//!   `release`, one target per example suite, composites)
//! - Optional `.pacttasks` YAML overlay adding or overriding targets
//! - Container matrix helpers computing `pactfoundation:*` image tags from
//!   positional arguments with documented defaults
//! - Broker gate switching the pytest invocation form between a
//!   suite-managed broker and an external one
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │            pactdev (CLI)             │
//! │   run / list / suites / docker …     │
//! └──────────────────────────────────────┘
//!       ▲               ▲            ▲
//!       │               │            │
//!  ┌────┴─────┐   ┌─────┴─────┐  ┌───┴────┐
//!  │ manifest │   │  runner   │  │ docker │
//!  │ (targets)│   │ (steps)   │  │ (tags) │
//!  └──────────┘   └───────────┘  └────────┘
//! ```

pub mod broker;
pub mod docker;
pub mod errors;
pub mod manifest;
pub mod runner;
pub mod suites;

pub use broker::{BrokerMode, BROKER_URL_ENV, DEFAULT_BROKER_URL, RUN_BROKER_ENV};
pub use docker::{ImageSpec, DEFAULT_ARCH, DEFAULT_OS, DEFAULT_OS_VERSION};
pub use errors::DevError;
pub use manifest::{TaskFile, TaskManifest, TASK_FILE_NAME};
pub use runner::{Step, Target, TargetReport, TargetStatus, TaskRunner};
pub use suites::{SuiteScanner, SuiteSummary};

/// Tool version
pub const VERSION: &str = "0.3.1";
