//! Example-suite discovery
//!
//! Scans a project's `examples/` directory for independently runnable
//! integration suites. A suite is a directory with a `requirements.txt`
//! and a `tests/` directory; the `v3/` subtree holds the version-suffixed
//! variants and is scanned one level deeper.

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Subtree holding version-suffixed suite variants
const V3_DIR: &str = "v3";

/// Summary of one discovered example suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteSummary {
    /// Suite name (`consumer`, `v3/flask_provider`, ...)
    pub name: String,
    /// Suite directory, relative to the project root
    pub path: PathBuf,
    /// Whether this is a version-suffixed (v3) variant
    pub v3: bool,
    /// Number of `test_*.py` files in the suite
    pub test_files: usize,
}

/// Scanner for example suites under a project root
pub struct SuiteScanner {
    root: PathBuf,
}

impl SuiteScanner {
    /// Create a scanner for a project root
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// List discovered suites, sorted by name.
    ///
    /// A missing `examples/` directory yields an empty list rather than an
    /// error so the command is usable outside a checkout.
    pub fn scan(&self) -> Result<Vec<SuiteSummary>> {
        let examples_dir = self.root.join("examples");
        if !examples_dir.is_dir() {
            tracing::debug!(dir = %examples_dir.display(), "no examples directory");
            return Ok(Vec::new());
        }

        let mut suites = Vec::new();
        for entry in fs::read_dir(&examples_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let dir_name = entry.file_name().to_string_lossy().to_string();
            if dir_name.starts_with('.') {
                continue;
            }

            if dir_name == V3_DIR {
                for v3_entry in fs::read_dir(&path)? {
                    let v3_entry = v3_entry?;
                    let v3_path = v3_entry.path();
                    if !v3_path.is_dir() {
                        continue;
                    }
                    let v3_name =
                        format!("{}/{}", V3_DIR, v3_entry.file_name().to_string_lossy());
                    if let Some(suite) = self.read_suite(&v3_path, &v3_name, true) {
                        suites.push(suite);
                    }
                }
                continue;
            }

            if let Some(suite) = self.read_suite(&path, &dir_name, false) {
                suites.push(suite);
            }
        }

        suites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(suites)
    }

    /// Summarize one candidate directory; non-suites yield None
    fn read_suite(&self, path: &Path, name: &str, v3: bool) -> Option<SuiteSummary> {
        if !path.join("requirements.txt").is_file() || !path.join("tests").is_dir() {
            return None;
        }

        let relative = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_path_buf();

        Some(SuiteSummary {
            name: name.to_string(),
            path: relative,
            v3,
            test_files: count_test_files(path),
        })
    }
}

fn count_test_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            name.starts_with("test_") && name.ends_with(".py")
        })
        .count()
}
