//! Drive the task sequence across projects and aggregate the outcome.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tool::{BuildTool, TaskStatus};

/// How one project's sequence ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProjectOutcome {
    Passed,
    /// `task` is the first task that did not succeed; later tasks never ran.
    Failed { task: String, detail: String },
}

/// Result for a single project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectReport {
    pub project: PathBuf,
    pub outcome: ProjectOutcome,
    /// Tasks that ran to success, in order.
    pub completed: Vec<String>,
    pub duration_ms: u64,
}

impl ProjectReport {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, ProjectOutcome::Passed)
    }
}

/// Aggregated result of one [`drive`] call.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub projects: Vec<ProjectReport>,
}

impl BuildReport {
    /// True when every project passed (vacuously true for none).
    pub fn success(&self) -> bool {
        self.projects.iter().all(ProjectReport::passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ProjectReport> {
        self.projects.iter().filter(|p| !p.passed())
    }
}

/// Run `tasks` in order against each project in `projects`.
///
/// Projects run one after another so their streamed output never interleaves.
/// A failure ends that project's sequence and is recorded; the remaining
/// projects still run.
pub fn drive(tool: &dyn BuildTool, projects: &[PathBuf], tasks: &[String]) -> BuildReport {
    let started_at = Utc::now();
    let reports = projects
        .iter()
        .map(|project| run_project(tool, project, tasks))
        .collect();
    BuildReport {
        started_at,
        finished_at: Utc::now(),
        projects: reports,
    }
}

fn run_project(tool: &dyn BuildTool, project: &Path, tasks: &[String]) -> ProjectReport {
    let start = Instant::now();
    let mut completed = Vec::with_capacity(tasks.len());
    let mut outcome = ProjectOutcome::Passed;

    for task in tasks {
        tracing::info!(project = %project.display(), task = %task, "task started");
        let failure = match tool.run_task(project, task) {
            Ok(TaskStatus::Succeeded) => None,
            Ok(TaskStatus::Failed { code: Some(code) }) => Some(format!("exited with status {code}")),
            Ok(TaskStatus::Failed { code: None }) => Some("terminated by signal".to_string()),
            Err(err) => Some(err.to_string()),
        };

        match failure {
            None => completed.push(task.clone()),
            Some(detail) => {
                tracing::error!(project = %project.display(), task = %task, %detail, "task failed");
                outcome = ProjectOutcome::Failed {
                    task: task.clone(),
                    detail,
                };
                break;
            }
        }
    }

    ProjectReport {
        project: project.to_path_buf(),
        outcome,
        completed,
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysOk;

    impl BuildTool for AlwaysOk {
        fn run_task(&self, _project: &Path, _task: &str) -> Result<TaskStatus, crate::DriverError> {
            Ok(TaskStatus::Succeeded)
        }
    }

    #[test]
    fn empty_project_list_succeeds() {
        let report = drive(&AlwaysOk, &[], &["clean".to_string()]);
        assert!(report.success());
        assert!(report.projects.is_empty());
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(ProjectOutcome::Failed {
            task: "app:lint".into(),
            detail: "exited with status 1".into(),
        })
        .expect("serialize");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["task"], "app:lint");
    }
}
