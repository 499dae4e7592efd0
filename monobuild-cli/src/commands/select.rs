//! `monobuild select` — print the projects HEAD requires building.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use monobuild_core::SelectionReason;
use monobuild_select::Selection;

use super::{relative, SelectionArgs};

/// Arguments for `monobuild select`.
#[derive(Args, Debug)]
pub struct SelectArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct SelectionJson<'a> {
    root: String,
    reason: &'a SelectionReason,
    reason_key: &'static str,
    all: bool,
    dirty: &'a [String],
    projects: Vec<String>,
}

impl SelectArgs {
    pub fn run(self) -> Result<ExitCode> {
        let selection = self.selection.select()?;
        if self.json {
            print_json(&selection)?;
        } else {
            print_human(&selection);
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn print_json(selection: &Selection) -> Result<()> {
    let result = &selection.result;
    let payload = SelectionJson {
        root: selection.root.display().to_string(),
        reason: &result.reason,
        reason_key: result.reason.key(),
        all: result.reason.selects_all(),
        dirty: &result.dirty,
        projects: result
            .projects
            .iter()
            .map(|p| relative(p, &selection.root))
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize selection JSON")?
    );
    Ok(())
}

fn print_human(selection: &Selection) {
    let result = &selection.result;
    if !result.dirty.is_empty() {
        println!("{} {}", "dirty:".bright_black(), result.dirty.join(", "));
    }
    println!("{}", result.reason.to_string().bold());

    if result.projects.is_empty() {
        println!("No projects found under {}.", selection.root.display());
        return;
    }
    for project in &result.projects {
        println!("  {}", relative(project, &selection.root));
    }
}
