//! Container helpers for the test matrix
//!
//! Replaces the `docker/build.sh` and `docker/run.sh` convenience scripts:
//! an `ImageSpec` is computed from positional arguments (Python version
//! required, architecture/OS/OS-version optional with documented defaults)
//! and drives either an image build against the platform-specific
//! Dockerfile or a container run with the working directory mounted.
//!
//! Argument strings are accepted as-is and interpolated directly into the
//! tag and the docker invocation; the only validation is the argument
//! count.

pub mod image;

pub use image::{ImageSpec, DEFAULT_ARCH, DEFAULT_OS, DEFAULT_OS_VERSION, RUST_BUILD_WORKAROUND_ENV};

use crate::errors::{DevError, Result};
use std::path::Path;
use std::process::Command;

/// Usage text printed when the required Python version is missing
pub const USAGE: &str = "\
Usage: pactdev docker <build|run> PYTHON_VERSION [PLATFORM_ARCH] [OS] [OS_VERSION]

  PYTHON_VERSION   Python version to bake into the image (e.g. 3.9)
  PLATFORM_ARCH    Image architecture (default: amd64)
  OS               Base OS of the image (default: alpine)
  OS_VERSION       Base OS version (default: 3.17)";

/// Build the test image described by `spec`, with `context` as the build
/// context directory. The build's exit code is propagated on failure.
pub fn build(spec: &ImageSpec, context: &Path) -> Result<()> {
    println!("[Docker] Building {} ({})", spec.tag(), spec.platform());
    invoke("docker build", &spec.build_args(), context)
}

/// Run the test image described by `spec` with `workdir` mounted at
/// `/home`. The container's exit code is propagated on failure.
pub fn run(spec: &ImageSpec, workdir: &Path) -> Result<()> {
    println!(
        "[Docker] Running {} with {} mounted at /home",
        spec.tag(),
        workdir.display()
    );
    invoke("docker run", &spec.run_args(workdir), workdir)
}

fn invoke(context_label: &str, args: &[String], dir: &Path) -> Result<()> {
    tracing::debug!(?args, "invoking docker");

    let status = Command::new("docker")
        .args(args)
        .current_dir(dir)
        .status()
        .map_err(|e| DevError::Docker(format!("Failed to invoke docker: {}", e)))?;

    if !status.success() {
        return Err(DevError::ChildExit {
            context: context_label.to_string(),
            code: status.code().unwrap_or(1),
        });
    }

    Ok(())
}
