//! Image specification and tag computation

use crate::errors::{DevError, Result};
use std::path::{Path, PathBuf};

/// Default image architecture
pub const DEFAULT_ARCH: &str = "amd64";

/// Default base OS
pub const DEFAULT_OS: &str = "alpine";

/// Default base OS version
pub const DEFAULT_OS_VERSION: &str = "3.17";

/// Environment variable injected for arm64 alpine containers.
///
/// The cryptography wheel has no musl/arm64 binary and its source build
/// needs a Rust toolchain the image does not carry; this flag keeps pip on
/// the pure-python fallback.
pub const RUST_BUILD_WORKAROUND_ENV: &str = "CRYPTOGRAPHY_DONT_BUILD_RUST";

/// One cell of the container test matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    pub python_version: String,
    pub arch: String,
    pub os: String,
    pub os_version: String,
}

impl ImageSpec {
    /// Spec for a Python version with all defaults
    pub fn new(python_version: &str) -> Self {
        Self {
            python_version: python_version.to_string(),
            arch: DEFAULT_ARCH.to_string(),
            os: DEFAULT_OS.to_string(),
            os_version: DEFAULT_OS_VERSION.to_string(),
        }
    }

    /// Parse the positional argument list `PYTHON_VERSION [PLATFORM_ARCH]
    /// [OS] [OS_VERSION]`.
    ///
    /// The Python version is required; the rest default to
    /// amd64/alpine/3.17. Arguments beyond the fourth are ignored, and no
    /// further validation is applied to any value.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let python_version = args
            .first()
            .ok_or_else(|| DevError::Usage(super::USAGE.to_string()))?;

        let mut spec = Self::new(python_version);
        if let Some(arch) = args.get(1) {
            spec.arch = arch.clone();
        }
        if let Some(os) = args.get(2) {
            spec.os = os.clone();
        }
        if let Some(os_version) = args.get(3) {
            spec.os_version = os_version.clone();
        }
        Ok(spec)
    }

    /// Computed image tag.
    ///
    /// Alpine tags carry the OS version
    /// (`pactfoundation:python<PY>-alpine-<OS_VERSION>-<ARCH>`); other OS
    /// tags do not (`pactfoundation:python<PY>-<OS>-<ARCH>`).
    pub fn tag(&self) -> String {
        if self.os == DEFAULT_OS {
            format!(
                "pactfoundation:python{}-{}-{}-{}",
                self.python_version, self.os, self.os_version, self.arch
            )
        } else {
            format!(
                "pactfoundation:python{}-{}-{}",
                self.python_version, self.os, self.arch
            )
        }
    }

    /// Dockerfile for this cell: `docker/Dockerfile` for alpine,
    /// `docker/Dockerfile.<OS>` otherwise
    pub fn dockerfile(&self) -> PathBuf {
        if self.os == DEFAULT_OS {
            PathBuf::from("docker/Dockerfile")
        } else {
            PathBuf::from(format!("docker/Dockerfile.{}", self.os))
        }
    }

    /// Docker platform string (`linux/<ARCH>`)
    pub fn platform(&self) -> String {
        format!("linux/{}", self.arch)
    }

    /// Whether this cell needs the cryptography build workaround
    pub fn needs_rust_build_workaround(&self) -> bool {
        self.arch == "arm64" && self.os == DEFAULT_OS
    }

    /// Argument list for `docker` to build this image
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "--platform".to_string(),
            self.platform(),
            "-t".to_string(),
            self.tag(),
            "-f".to_string(),
            self.dockerfile().display().to_string(),
            "--build-arg".to_string(),
            format!("PYTHON_VERSION={}", self.python_version),
        ];

        // Only the alpine Dockerfile takes a base-image version argument
        if self.os == DEFAULT_OS {
            args.push("--build-arg".to_string());
            args.push(format!("ALPINE_VERSION={}", self.os_version));
        }

        args.push(".".to_string());
        args
    }

    /// Argument list for `docker` to run this image with `workdir` mounted
    /// at `/home`
    pub fn run_args(&self, workdir: &Path) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "-it".to_string(),
            "--platform".to_string(),
            self.platform(),
            "-v".to_string(),
            format!("{}:/home", workdir.display()),
            "-w".to_string(),
            "/home".to_string(),
        ];

        if self.needs_rust_build_workaround() {
            args.push("-e".to_string());
            args.push(format!("{}=1", RUST_BUILD_WORKAROUND_ENV));
        }

        args.push(self.tag());
        args
    }
}
