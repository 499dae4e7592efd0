//! Project detection for `monobuild-detector`.
//!
//! A directory is a project when its immediate children include every marker
//! the [`Layout`] requires (by default `build.gradle` and `app`). Detection
//! looks one level deep only, never reads file contents, and treats anything
//! it cannot read as "not a project".

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use monobuild_core::{Layout, ProjectDescriptor, Verdict};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Whether `path` is a directory whose children include all required markers.
pub fn is_project(path: &Path, layout: &Layout) -> bool {
    let Some(names) = child_names(path) else {
        return false;
    };
    layout.required_markers().iter().all(|m| names.contains(*m))
}

/// Classify `path` into a [`ProjectDescriptor`].
pub fn classify(path: &Path, layout: &Layout) -> ProjectDescriptor {
    let verdict = if is_project(path, layout) { Verdict::Project } else { Verdict::NotProject };
    ProjectDescriptor { path: path.to_path_buf(), verdict }
}

/// Every immediate child of `root` that classifies as a project, sorted by name.
///
/// An unreadable root yields an empty list.
pub fn all_projects(root: &Path, layout: &Layout) -> Vec<PathBuf> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(root = %root.display(), error = %err, "cannot list repository root");
            return vec![];
        }
    };

    let mut projects: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_project(p, layout))
        .collect();
    projects.sort();
    projects
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

/// Names of the direct children of `path`, or `None` when it is not a readable directory.
fn child_names(path: &Path) -> Option<HashSet<String>> {
    if !path.is_dir() {
        return None;
    }
    let entries = fs::read_dir(path).ok()?;
    Some(
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
    )
}
