//! `monobuild classify <path>...` — report the project verdict for each path.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use monobuild_core::{Layout, Verdict};
use monobuild_detector::classify;

/// Arguments for `monobuild classify`.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Paths to classify.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Layout file supplying the marker names; defaults apply otherwise.
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,
}

impl ClassifyArgs {
    pub fn run(self) -> Result<ExitCode> {
        let layout = match &self.layout {
            Some(path) => Layout::load(path)
                .with_context(|| format!("failed to load layout {}", path.display()))?,
            None => Layout::default(),
        };

        for path in &self.paths {
            let descriptor = classify(path, &layout);
            let label = match descriptor.verdict {
                Verdict::Project => "project".green().bold(),
                Verdict::NotProject => "not a project".bright_black(),
            };
            println!("{}\t{}", path.display(), label);
        }
        Ok(ExitCode::SUCCESS)
    }
}
