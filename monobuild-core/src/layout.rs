//! Monorepo layout: the reserved names that decide what a project is and which
//! top-level changes force a full rebuild.
//!
//! # File format
//!
//! ```yaml
//! manifest: build.gradle
//! app_dir: app
//! infrastructure_files: [.travis.yml]
//! tooling_dir: builder
//! ```
//!
//! Every key is optional; omitted keys take the defaults shown above.
//! `<root>/monobuild.yaml` is picked up automatically by [`Layout::load_or_default`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::types::EntryKind;

/// File name looked up at the repository root by [`Layout::load_or_default`].
pub const LAYOUT_FILE: &str = "monobuild.yaml";

/// Task run first against every selected project.
pub const CLEAN_TASK: &str = "clean";
/// Task run last against every selected project.
pub const BUILD_TASK: &str = "build";

/// Reserved names for one monorepo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Build manifest every project carries at its top level.
    pub manifest: String,
    /// Application subdirectory every project carries; also the lint task prefix.
    pub app_dir: String,
    /// Root-level files whose change rebuilds everything.
    pub infrastructure_files: Vec<String>,
    /// Directory holding the selection tooling; its change rebuilds everything.
    pub tooling_dir: String,
    /// Top-level entry holding an explicitly chosen layout file inside the
    /// repository; a change to it rebuilds everything.
    #[serde(skip)]
    pub source_entry: Option<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            manifest: "build.gradle".to_string(),
            app_dir: "app".to_string(),
            infrastructure_files: vec![".travis.yml".to_string()],
            tooling_dir: "builder".to_string(),
            source_entry: None,
        }
    }
}

impl Layout {
    /// Load a layout from an explicit YAML file.
    ///
    /// Returns `LayoutError::NotFound` if absent, `LayoutError::Parse` (with
    /// path + line context) if malformed.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LayoutError::NotFound { path: path.to_path_buf() });
            }
            Err(e) => {
                return Err(LayoutError::Io { path: path.to_path_buf(), source: e });
            }
        };
        // An empty file is a valid "all defaults" layout.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let layout: Layout = serde_yaml::from_str(&contents).map_err(|e| LayoutError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        layout.validate()?;
        Ok(layout)
    }

    /// Load `<root>/monobuild.yaml` when present, otherwise the defaults.
    pub fn load_or_default(root: &Path) -> Result<Self, LayoutError> {
        let path = Self::path_in(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// `<root>/monobuild.yaml` — pure, no I/O.
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(LAYOUT_FILE)
    }

    /// Reject names that could not be a single top-level entry.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_segment("manifest", &self.manifest)?;
        check_segment("app_dir", &self.app_dir)?;
        check_segment("tooling_dir", &self.tooling_dir)?;
        for file in &self.infrastructure_files {
            check_segment("infrastructure_files", file)?;
        }
        Ok(())
    }

    /// Names a directory's children must include for it to be a project.
    pub fn required_markers(&self) -> [&str; 2] {
        [self.manifest.as_str(), self.app_dir.as_str()]
    }

    /// The lint task, scoped to the application subproject (`app:lint`).
    pub fn lint_task(&self) -> String {
        format!("{}:lint", self.app_dir)
    }

    /// Task identifiers in the order they run against each project.
    pub fn tasks(&self) -> Vec<String> {
        vec![CLEAN_TASK.to_string(), self.lint_task(), BUILD_TASK.to_string()]
    }

    /// Record the top-level entry that contains the layout file in use.
    pub fn with_source_entry(mut self, entry: impl Into<String>) -> Self {
        self.source_entry = Some(entry.into());
        self
    }

    /// Whether a changed top-level entry is shared build infrastructure.
    ///
    /// Infrastructure files match by name alone; the tooling directory must
    /// be a directory in the tree. The layout file itself always counts, as
    /// does the entry holding an explicit layout file.
    pub fn is_infrastructure(&self, path: &str, kind: EntryKind) -> bool {
        if path == LAYOUT_FILE || self.infrastructure_files.iter().any(|f| f == path) {
            return true;
        }
        if self.source_entry.as_deref() == Some(path) {
            return true;
        }
        kind == EntryKind::Directory && path == self.tooling_dir
    }
}

fn check_segment(field: &'static str, value: &str) -> Result<(), LayoutError> {
    if value.is_empty() || value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        return Err(LayoutError::InvalidName { field, value: value.to_string() });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
