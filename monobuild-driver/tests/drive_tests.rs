//! Task sequencing and partial-failure reporting.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use monobuild_core::Layout;
use monobuild_driver::{drive, BuildTool, DriverError, ProjectOutcome, TaskStatus};

// ---------------------------------------------------------------------------
// Recording fake
// ---------------------------------------------------------------------------

/// Records every call; fails `fail_task` in `fail_project` when set.
#[derive(Default)]
struct RecordingTool {
    calls: RefCell<Vec<(String, String)>>,
    fail: Option<(&'static str, &'static str)>,
    unlaunchable: Option<&'static str>,
}

impl RecordingTool {
    fn failing(project: &'static str, task: &'static str) -> Self {
        Self {
            fail: Some((project, task)),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl BuildTool for RecordingTool {
    fn run_task(&self, project: &Path, task: &str) -> Result<TaskStatus, DriverError> {
        let name = project.file_name().unwrap().to_string_lossy().into_owned();
        self.calls.borrow_mut().push((name.clone(), task.to_string()));

        if self.unlaunchable == Some(name.as_str()) {
            return Err(DriverError::Spawn {
                program: "gradle".to_string(),
                project: project.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        match self.fail {
            Some((p, t)) if p == name && t == task => Ok(TaskStatus::Failed { code: Some(1) }),
            _ => Ok(TaskStatus::Succeeded),
        }
    }
}

fn projects(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| PathBuf::from("/repo").join(n)).collect()
}

fn call(project: &str, task: &str) -> (String, String) {
    (project.to_string(), task.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn runs_clean_lint_build_in_order_per_project() {
    let tool = RecordingTool::default();
    let report = drive(&tool, &projects(&["projA", "projB"]), &Layout::default().tasks());

    assert!(report.success());
    assert_eq!(
        tool.calls(),
        vec![
            call("projA", "clean"),
            call("projA", "app:lint"),
            call("projA", "build"),
            call("projB", "clean"),
            call("projB", "app:lint"),
            call("projB", "build"),
        ]
    );
    assert_eq!(report.projects[0].completed, vec!["clean", "app:lint", "build"]);
}

#[test]
fn failure_stops_that_project_but_not_the_next() {
    let tool = RecordingTool::failing("projA", "app:lint");
    let report = drive(&tool, &projects(&["projA", "projB"]), &Layout::default().tasks());

    assert!(!report.success());
    assert_eq!(
        tool.calls(),
        vec![
            call("projA", "clean"),
            call("projA", "app:lint"),
            call("projB", "clean"),
            call("projB", "app:lint"),
            call("projB", "build"),
        ]
    );

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].project, PathBuf::from("/repo/projA"));
    assert_eq!(
        failed[0].outcome,
        ProjectOutcome::Failed {
            task: "app:lint".to_string(),
            detail: "exited with status 1".to_string(),
        }
    );
    assert_eq!(failed[0].completed, vec!["clean"]);
    assert!(report.projects[1].passed());
}

#[test]
fn launch_error_is_recorded_as_failure() {
    let tool = RecordingTool {
        unlaunchable: Some("projB"),
        ..RecordingTool::default()
    };
    let report = drive(&tool, &projects(&["projA", "projB", "projC"]), &Layout::default().tasks());

    let outcomes: Vec<bool> = report.projects.iter().map(|p| p.passed()).collect();
    assert_eq!(outcomes, vec![true, false, true]);
    match &report.projects[1].outcome {
        ProjectOutcome::Failed { task, detail } => {
            assert_eq!(task, "clean");
            assert!(detail.contains("failed to launch gradle"), "got: {detail}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn report_serializes_for_ci() {
    let tool = RecordingTool::failing("projB", "build");
    let report = drive(&tool, &projects(&["projA", "projB"]), &Layout::default().tasks());
    let json = serde_json::to_value(&report).expect("serialize");

    assert_eq!(json["projects"][0]["outcome"]["status"], "passed");
    assert_eq!(json["projects"][1]["outcome"]["status"], "failed");
    assert_eq!(json["projects"][1]["outcome"]["task"], "build");
    assert!(json["started_at"].is_string());
}

// ---------------------------------------------------------------------------
// Real process, via a stand-in wrapper script
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn gradle_tool_runs_wrapper_with_task_and_reports_exit_status() {
    use std::os::unix::fs::PermissionsExt;

    use monobuild_driver::GradleTool;

    let dir = tempfile::TempDir::new().expect("tempdir");
    let log = dir.path().join("calls.log");
    let script = format!(
        "#!/bin/sh\nfor last; do :; done\necho \"$last\" >> '{}'\n[ \"$last\" != \"app:lint\" ]\n",
        log.display()
    );
    let wrapper = dir.path().join("gradlew");
    std::fs::write(&wrapper, script).expect("write wrapper");
    std::fs::set_permissions(&wrapper, std::fs::Permissions::from_mode(0o755)).expect("chmod");

    let tool = GradleTool::new("gradle-not-used");
    assert_eq!(tool.run_task(dir.path(), "clean").expect("clean"), TaskStatus::Succeeded);
    assert_eq!(
        tool.run_task(dir.path(), "app:lint").expect("lint"),
        TaskStatus::Failed { code: Some(1) }
    );

    let logged = std::fs::read_to_string(&log).expect("read log");
    assert_eq!(logged, "clean\napp:lint\n");
}
