//! The build tool seam and its Gradle implementation.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::DriverError;

/// Outcome of one task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Succeeded,
    /// The tool ran and reported failure; `code` is `None` when killed by a signal.
    Failed { code: Option<i32> },
}

/// Runs a single named task against a project directory.
///
/// Implementations stream the tool's own output; callers only look at the
/// returned status.
pub trait BuildTool {
    /// Run `task` in `project`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the tool cannot be started at all.
    fn run_task(&self, project: &Path, task: &str) -> Result<TaskStatus, DriverError>;
}

/// Gradle, preferring the project's own wrapper script when it has one.
#[derive(Debug, Clone)]
pub struct GradleTool {
    /// Program used when the project has no wrapper.
    program: String,
    /// Arguments placed before the task name on every invocation.
    extra_args: Vec<String>,
    /// Send the tool's stdout to our stderr, keeping stdout for reports.
    stdout_to_stderr: bool,
}

impl Default for GradleTool {
    fn default() -> Self {
        Self::new("gradle")
    }
}

impl GradleTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: vec![],
            stdout_to_stderr: false,
        }
    }

    /// Extra arguments for every task, e.g. `--no-daemon` on CI.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }

    /// The executable that would run tasks for `project`.
    pub fn program_for(&self, project: &Path) -> PathBuf {
        let wrapper = project.join(WRAPPER);
        if wrapper.is_file() {
            wrapper
        } else {
            PathBuf::from(&self.program)
        }
    }

    /// Full argument list for `task` in `project`.
    pub fn args_for(&self, project: &Path, task: &str) -> Vec<String> {
        let mut args = vec![
            "--project-dir".to_string(),
            project.display().to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args.push(task.to_string());
        args
    }
}

#[cfg(windows)]
const WRAPPER: &str = "gradlew.bat";
#[cfg(not(windows))]
const WRAPPER: &str = "gradlew";

impl BuildTool for GradleTool {
    fn run_task(&self, project: &Path, task: &str) -> Result<TaskStatus, DriverError> {
        let program = self.program_for(project);
        let args = self.args_for(project, task);
        tracing::debug!(program = %program.display(), ?args, "running build task");

        let stdout = if self.stdout_to_stderr {
            Stdio::from(std::io::stderr())
        } else {
            Stdio::inherit()
        };
        let status = Command::new(&program)
            .args(&args)
            .current_dir(project)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| DriverError::Spawn {
                program: program.display().to_string(),
                project: project.to_path_buf(),
                source: e,
            })?;

        if status.success() {
            Ok(TaskStatus::Succeeded)
        } else {
            Ok(TaskStatus::Failed {
                code: status.code(),
            })
        }
    }
}
