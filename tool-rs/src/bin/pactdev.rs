//! pactdev - pact-python development CLI
//!
//! Command-line interface for the development pipeline: named targets,
//! example-suite discovery and the container test-matrix helpers

use clap::{Parser, Subcommand};
use pactdev_core::errors::Result;
use pactdev_core::{docker, DevError, ImageSpec, SuiteScanner, TaskManifest, TaskRunner};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pactdev")]
#[command(version = "0.3.1")]
#[command(about = "pact-python development task runner", long_about = None)]
struct Cli {
    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more named targets sequentially
    Run {
        /// Target names (see `pactdev list`)
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// List available targets
    List,
    /// List discovered example suites
    Suites,
    /// Container test-matrix helpers (build, run)
    Docker {
        #[command(subcommand)]
        command: DockerCommands,
    },
}

#[derive(Subcommand)]
enum DockerCommands {
    /// Build a test image: PYTHON_VERSION [PLATFORM_ARCH] [OS] [OS_VERSION]
    Build {
        /// Positional arguments, python version first
        args: Vec<String>,
    },
    /// Run a test image with the working directory mounted at /home
    Run {
        /// Positional arguments, python version first
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = dispatch(cli).await {
        let code = e.exit_code();
        match e {
            DevError::Usage(usage) => eprintln!("{}", usage),
            other => eprintln!("Error: {}", other),
        }
        std::process::exit(code);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { targets } => handle_run(cli.root, &targets).await,
        Commands::List => handle_list(cli.root),
        Commands::Suites => handle_suites(cli.root),
        Commands::Docker { command } => match command {
            DockerCommands::Build { args } => handle_docker_build(cli.root, &args),
            DockerCommands::Run { args } => handle_docker_run(&args),
        },
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Handle `pactdev run <targets...>`
async fn handle_run(root: PathBuf, targets: &[String]) -> Result<()> {
    let root = root.canonicalize()?;
    let manifest = TaskManifest::load(&root)?;
    let mut runner = TaskRunner::new(root, manifest);
    runner.run_targets(targets).await?;
    Ok(())
}

/// Handle `pactdev list`
fn handle_list(root: PathBuf) -> Result<()> {
    let manifest = TaskManifest::load(&root)?;

    println!("\n{:<16} {:<6} {:<28} {}", "NAME", "STEPS", "NEEDS", "DESCRIPTION");
    println!("{}", "-".repeat(88));
    for target in manifest.targets() {
        println!(
            "{:<16} {:<6} {:<28} {}",
            target.name,
            target.steps.len(),
            target.needs.join(", "),
            target.description
        );
    }
    println!();

    Ok(())
}

/// Handle `pactdev suites`
fn handle_suites(root: PathBuf) -> Result<()> {
    let scanner = SuiteScanner::new(root);
    let suites = scanner.scan()?;

    if suites.is_empty() {
        println!("No example suites found.");
        return Ok(());
    }

    println!("\n{:<24} {:<32} {}", "NAME", "PATH", "TEST FILES");
    println!("{}", "-".repeat(68));
    for suite in suites {
        println!(
            "{:<24} {:<32} {}",
            suite.name,
            suite.path.display(),
            suite.test_files
        );
    }
    println!();

    Ok(())
}

/// Handle `pactdev docker build [args...]`
fn handle_docker_build(root: PathBuf, args: &[String]) -> Result<()> {
    let spec = ImageSpec::from_args(args)?;
    docker::build(&spec, &root)
}

/// Handle `pactdev docker run [args...]`
///
/// Mounts the invoking working directory, not `--root`: the container is a
/// shell onto whatever the caller is standing in, exactly like the script
/// it replaces.
fn handle_docker_run(args: &[String]) -> Result<()> {
    let spec = ImageSpec::from_args(args)?;
    let workdir = std::env::current_dir()?;
    docker::run(&spec, &workdir)
}
