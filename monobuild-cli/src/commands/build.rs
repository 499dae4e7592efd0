//! `monobuild build` — select projects, then clean, lint and build each one.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use monobuild_core::SelectionReason;
use monobuild_driver::{drive, BuildReport, GradleTool, ProjectOutcome};

use super::{relative, SelectionArgs};

/// Arguments for `monobuild build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Gradle executable used for projects without a `gradlew` wrapper.
    #[arg(long, env = "MONOBUILD_GRADLE", default_value = "gradle", value_name = "PROG")]
    pub gradle: String,

    /// Extra argument passed to every Gradle invocation (repeatable).
    #[arg(long = "gradle-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub gradle_args: Vec<String>,

    /// Print the task plan without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the build report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct BuildJson<'a> {
    reason: &'a SelectionReason,
    reason_key: &'static str,
    success: bool,
    report: &'a BuildReport,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "project")]
    project: String,
    #[tabled(rename = "result")]
    result: String,
    #[tabled(rename = "detail")]
    detail: String,
    #[tabled(rename = "time")]
    time: String,
}

impl BuildArgs {
    pub fn run(self) -> Result<ExitCode> {
        let selection = self.selection.select()?;
        let tasks = selection.layout.tasks();
        let projects = &selection.result.projects;

        if self.dry_run {
            println!("{} {}", "[dry-run]".bright_black(), selection.result.reason);
            for project in projects {
                println!("  {}: {}", relative(project, &selection.root), tasks.join(" → "));
            }
            return Ok(ExitCode::SUCCESS);
        }

        if !self.json {
            if !selection.result.dirty.is_empty() {
                println!("{} {}", "dirty:".bright_black(), selection.result.dirty.join(", "));
            }
            println!("{}", selection.result.reason.to_string().bold());
        }

        let tool = GradleTool::new(self.gradle.clone())
            .with_args(self.gradle_args.clone())
            .with_stdout_to_stderr(self.json);
        let report = drive(&tool, projects, &tasks);

        if self.json {
            let payload = BuildJson {
                reason: &selection.result.reason,
                reason_key: selection.result.reason.key(),
                success: report.success(),
                report: &report,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize build JSON")?
            );
        } else {
            print_table(&report, &selection.root);
        }

        Ok(if report.success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

fn print_table(report: &BuildReport, root: &Path) {
    if report.projects.is_empty() {
        println!("No projects to build.");
        return;
    }

    let rows: Vec<ProjectRow> = report
        .projects
        .iter()
        .map(|p| {
            let (result, detail) = match &p.outcome {
                ProjectOutcome::Passed => ("PASS".to_string(), String::new()),
                ProjectOutcome::Failed { task, detail } => {
                    ("FAIL".to_string(), format!("{task}: {detail}"))
                }
            };
            ProjectRow {
                project: relative(&p.project, root),
                result,
                detail,
                time: format!("{:.1}s", p.duration_ms as f64 / 1000.0),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let failed: Vec<String> = report.failed().map(|p| relative(&p.project, root)).collect();
    if failed.is_empty() {
        println!("{} {} project(s) passed", "✓".green().bold(), report.projects.len());
    } else {
        println!(
            "{} {} of {} project(s) failed: {}",
            "✗".red().bold(),
            failed.len(),
            report.projects.len(),
            failed.join(", ")
        );
    }
}
