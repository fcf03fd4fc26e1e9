//! Built-in target table
//!
//! One target per entry in the pact-python development pipeline: the main
//! install/lint/test/package/release chain plus one target per example
//! suite. Example suites install their own requirements, then run pytest
//! from the suite directory; the pytest step is broker-gated so the broker
//! flag can switch its invocation form.

use crate::manifest::TaskManifest;
use crate::runner::{Step, Target};
use once_cell::sync::Lazy;

static TABLE: Lazy<TaskManifest> = Lazy::new(|| {
    TaskManifest::from_targets(vec![
        Target::new(
            "venv",
            "Create the development virtualenv",
            vec![
                Step::new("python3", &["-m", "venv", ".venv"]),
                Step::new(".venv/bin/pip", &["install", "--upgrade", "pip"]),
            ],
        ),
        Target::new(
            "deps",
            "Install development dependencies",
            vec![
                Step::new("pip", &["install", "-r", "requirements_dev.txt"]),
                Step::new("pip", &["install", "-e", "."]),
            ],
        ),
        Target::new(
            "clean",
            "Remove build artifacts",
            vec![Step::new(
                "rm",
                &["-rf", "build", "dist", "pact_python.egg-info"],
            )],
        ),
        Target::new(
            "test",
            "Lint and run the unit test suite",
            vec![
                Step::new("flake8", &[]),
                Step::new("pydocstyle", &["pact"]),
                Step::new("coverage", &["erase"]),
                Step::new("pytest", &["tests", "--cov=pact", "--cov-report=term-missing"]),
            ],
        ),
        Target::new(
            "package",
            "Build sdist and wheel",
            vec![Step::new("python", &["setup.py", "sdist", "bdist_wheel"])],
        ),
        Target::composite(
            "release",
            "Full release pipeline",
            &["deps", "test", "package"],
        ),
        example_suite("consumer", "examples/consumer"),
        example_suite("flask", "examples/flask_provider"),
        example_suite("fastapi", "examples/fastapi_provider"),
        example_suite("messaging", "examples/message"),
        example_suite("flask-v3", "examples/v3/flask_provider"),
        example_suite("messaging-v3", "examples/v3/message"),
        Target::composite(
            "examples",
            "Run every example suite",
            &[
                "consumer",
                "flask",
                "fastapi",
                "messaging",
                "flask-v3",
                "messaging-v3",
            ],
        ),
    ])
    .expect("built-in target table is valid")
});

/// One example suite: install its requirements, run pytest from its
/// directory with the broker gate applied
fn example_suite(name: &str, dir: &str) -> Target {
    Target::new(
        name,
        &format!("Run the {} example suite", name),
        vec![
            Step::new("pip", &["install", "-r", "requirements.txt"]).in_dir(dir),
            Step::new("pytest", &[]).in_dir(dir).broker_gated(),
        ],
    )
}

pub(crate) fn table() -> &'static TaskManifest {
    &TABLE
}
