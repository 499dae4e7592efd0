//! Turn a change set into the list of projects to build.
//!
//! Decision order:
//! 1. History unreadable → every project (`RepositoryError`)
//! 2. Infrastructure file or tooling directory changed → every project (`InfrastructureChange`)
//! 3. Changed paths that classify as projects → those projects (`ProjectChanges`)
//! 4. Nothing mapped to a project → every project (`NoProjectChanges`)
//!
//! Every branch that cannot prove a narrower set builds everything.

use std::path::{Path, PathBuf};

use monobuild_core::{ChangeSet, Layout, SelectionReason, SelectionResult};
use monobuild_detector::{all_projects, is_project};

use crate::error::RepoError;

/// Select the projects under `root` affected by `changes`.
pub fn select(
    root: &Path,
    layout: &Layout,
    changes: Result<ChangeSet, RepoError>,
) -> SelectionResult {
    let changes = match changes {
        Ok(changes) => changes,
        Err(err) => {
            tracing::warn!(error = %err, "cannot read repository history");
            return everything(
                root,
                layout,
                SelectionReason::RepositoryError {
                    message: err.to_string(),
                },
                vec![],
            );
        }
    };

    let dirty = changes.paths();
    let mut candidates: Vec<PathBuf> = Vec::new();

    for (path, kind) in changes.iter() {
        tracing::info!(path, %kind, "dirty");

        if layout.is_infrastructure(path, kind) {
            tracing::info!(path, "infrastructure modified");
            return everything(
                root,
                layout,
                SelectionReason::InfrastructureChange {
                    path: path.to_string(),
                },
                dirty,
            );
        }

        let candidate = root.join(path);
        if is_project(&candidate, layout) {
            tracing::info!(path, "added project");
            candidates.push(candidate);
        } else {
            tracing::info!(path, "not a project");
        }
    }

    if candidates.is_empty() {
        tracing::info!(dirty = dirty.len(), "no modified projects");
        return everything(root, layout, SelectionReason::NoProjectChanges, dirty);
    }

    tracing::info!(
        projects = ?candidates.iter().map(|p| display_name(p)).collect::<Vec<_>>(),
        "building modified projects"
    );
    SelectionResult {
        projects: candidates,
        reason: SelectionReason::ProjectChanges,
        dirty,
    }
}

fn everything(
    root: &Path,
    layout: &Layout,
    reason: SelectionReason,
    dirty: Vec<String>,
) -> SelectionResult {
    let projects = all_projects(root, layout);
    tracing::info!(count = projects.len(), reason = reason.key(), "building all projects");
    SelectionResult {
        projects,
        reason,
        dirty,
    }
}

/// Last path component, for log lines and reports.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use monobuild_core::EntryKind;
    use rstest::rstest;
    use tempfile::TempDir;

    /// `projA/` and `projB/` projects, a `builder/` tool dir and a README.
    fn monorepo() -> TempDir {
        let root = TempDir::new().expect("tempdir");
        for name in ["projA", "projB"] {
            let dir = root.path().join(name);
            fs::create_dir_all(dir.join("app")).expect("mkdir");
            fs::write(dir.join("build.gradle"), "").expect("write manifest");
        }
        fs::create_dir_all(root.path().join("builder").join("src")).expect("mkdir builder");
        fs::write(root.path().join("README.md"), "# monorepo").expect("write readme");
        fs::write(root.path().join(".travis.yml"), "language: android").expect("write ci");
        root
    }

    fn changes(paths: &[(&str, EntryKind)]) -> ChangeSet {
        paths.iter().map(|(p, k)| (p.to_string(), *k)).collect()
    }

    fn names(result: &SelectionResult) -> Vec<String> {
        result.projects.iter().map(|p| display_name(p)).collect()
    }

    #[test]
    fn repository_error_selects_everything() {
        let root = monorepo();
        let err = RepoError::RepositoryUnavailable {
            reason: "no repository".into(),
        };
        let result = select(root.path(), &Layout::default(), Err(err));
        assert_eq!(names(&result), vec!["projA", "projB"]);
        assert!(matches!(result.reason, SelectionReason::RepositoryError { .. }));
        assert!(result.dirty.is_empty());
    }

    #[test]
    fn unreadable_history_selects_everything() {
        let root = monorepo();
        let err = RepoError::HistoryRead {
            what: "commit",
            id: "4b825dc642cb6eb9a060e54bf8d69288fbee4904".into(),
            source: git2::Error::from_str("object not found"),
        };
        let result = select(root.path(), &Layout::default(), Err(err));
        assert_eq!(names(&result), vec!["projA", "projB"]);
        match &result.reason {
            SelectionReason::RepositoryError { message } => {
                assert!(message.contains("4b825dc6"), "got: {message}");
            }
            other => panic!("expected repository error, got {other:?}"),
        }
    }

    #[test]
    fn single_project_change_selects_only_it() {
        let root = monorepo();
        let result = select(
            root.path(),
            &Layout::default(),
            Ok(changes(&[("projA", EntryKind::Directory)])),
        );
        assert_eq!(names(&result), vec!["projA"]);
        assert_eq!(result.reason, SelectionReason::ProjectChanges);
        assert_eq!(result.dirty, vec!["projA"]);
    }

    #[test]
    fn documentation_only_change_falls_back_to_everything() {
        let root = monorepo();
        let result = select(
            root.path(),
            &Layout::default(),
            Ok(changes(&[("README.md", EntryKind::File)])),
        );
        assert_eq!(names(&result), vec!["projA", "projB"]);
        assert_eq!(result.reason, SelectionReason::NoProjectChanges);
    }

    #[test]
    fn empty_change_set_falls_back_to_everything() {
        let root = monorepo();
        let result = select(root.path(), &Layout::default(), Ok(ChangeSet::new()));
        assert_eq!(names(&result), vec!["projA", "projB"]);
        assert_eq!(result.reason, SelectionReason::NoProjectChanges);
    }

    #[rstest]
    #[case(".travis.yml", EntryKind::File)]
    #[case("builder", EntryKind::Directory)]
    #[case("monobuild.yaml", EntryKind::File)]
    fn infrastructure_change_wins_over_project_changes(
        #[case] infra: &str,
        #[case] kind: EntryKind,
    ) {
        let root = monorepo();
        let result = select(
            root.path(),
            &Layout::default(),
            Ok(changes(&[("projA", EntryKind::Directory), (infra, kind)])),
        );
        assert_eq!(names(&result), vec!["projA", "projB"]);
        assert_eq!(
            result.reason,
            SelectionReason::InfrastructureChange {
                path: infra.to_string()
            }
        );
    }

    #[test]
    fn file_named_like_tooling_dir_is_not_infrastructure() {
        let root = monorepo();
        let result = select(
            root.path(),
            &Layout::default(),
            Ok(changes(&[("builder", EntryKind::File), ("projB", EntryKind::Directory)])),
        );
        assert_eq!(names(&result), vec!["projB"]);
    }

    #[test]
    fn removed_project_is_not_a_candidate() {
        let root = monorepo();
        let result = select(
            root.path(),
            &Layout::default(),
            Ok(changes(&[("projGone", EntryKind::Directory)])),
        );
        assert_eq!(result.reason, SelectionReason::NoProjectChanges);
        assert_eq!(names(&result), vec!["projA", "projB"]);
    }

    #[test]
    fn selection_is_idempotent() {
        let root = monorepo();
        let set = changes(&[("projB", EntryKind::Directory), ("README.md", EntryKind::File)]);
        let first = select(root.path(), &Layout::default(), Ok(set.clone()));
        let second = select(root.path(), &Layout::default(), Ok(set));
        assert_eq!(first, second);
    }
}
