//! monobuild — build only the monorepo projects a commit touched.
//!
//! # Usage
//!
//! ```text
//! monobuild select [--root DIR] [--layout FILE] [--json]
//! monobuild build  [--root DIR] [--layout FILE] [--gradle PROG] [--gradle-arg ARG]... [--dry-run] [--json]
//! monobuild classify <PATH>... [--layout FILE]
//! ```
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` to see
//! every dirty path and how it was classified.

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{build::BuildArgs, classify::ClassifyArgs, select::SelectArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "monobuild",
    version,
    about = "Select and build the monorepo projects affected by the latest commit",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the projects the HEAD commit requires building, and why.
    Select(SelectArgs),

    /// Select projects, then run clean, lint and build against each one.
    Build(BuildArgs),

    /// Report whether each path is a project directory.
    Classify(ClassifyArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Select(args) => args.run(),
        Commands::Build(args) => args.run(),
        Commands::Classify(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
