//! Domain types shared by selection, classification and the build driver.
//!
//! All path fields use `PathBuf`; repository-relative names stay `String`
//! because they come from git tree entries, not the filesystem.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Hex object id of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommitId(pub String);

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CommitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CommitId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Hex object id of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeId(pub String);

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TreeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TreeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Commits and tree entries
// ---------------------------------------------------------------------------

/// A commit as read from the repository. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: CommitId,
    pub tree: TreeId,
    /// Parent ids in recorded order; more than one only for merges.
    pub parents: Vec<CommitId>,
}

impl Commit {
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// What a top-level tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    /// A gitlink (submodule commit).
    Submodule,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
            EntryKind::Submodule => write!(f, "submodule"),
        }
    }
}

/// One entry directly under the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Entry name, which is also its path relative to the root.
    pub path: String,
    pub kind: EntryKind,
    /// Hex object id the entry points at.
    pub object: String,
    /// Raw git file mode.
    pub mode: i32,
}

impl TreeEntry {
    /// Two entries are the same content when both id and mode match.
    pub fn same_content(&self, other: &TreeEntry) -> bool {
        self.object == other.object && self.mode == other.mode
    }
}

// ---------------------------------------------------------------------------
// Change set
// ---------------------------------------------------------------------------

/// Top-level paths that differ between head and at least one parent.
///
/// Keyed by path so duplicates collapse and iteration order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    entries: BTreeMap<String, EntryKind>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as changed. The first kind recorded for a path wins.
    pub fn insert(&mut self, path: impl Into<String>, kind: EntryKind) {
        self.entries.entry(path.into()).or_insert(kind);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn kind_of(&self, path: &str) -> Option<EntryKind> {
        self.entries.get(path).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Changed paths with their kinds, sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = (&str, EntryKind)> {
        self.entries.iter().map(|(p, k)| (p.as_str(), *k))
    }

    pub fn paths(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

impl FromIterator<(String, EntryKind)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (String, EntryKind)>>(iter: I) -> Self {
        let mut set = ChangeSet::new();
        for (path, kind) in iter {
            set.insert(path, kind);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Outcome of the marker check for a single directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Project,
    NotProject,
}

/// A filesystem path together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub path: PathBuf,
    pub verdict: Verdict,
}

impl ProjectDescriptor {
    pub fn is_project(&self) -> bool {
        self.verdict == Verdict::Project
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Why a set of projects was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionReason {
    /// History could not be read; everything is rebuilt.
    RepositoryError { message: String },
    /// A reserved infrastructure path changed; everything is rebuilt.
    InfrastructureChange { path: String },
    /// Only the projects touched by the change are rebuilt.
    ProjectChanges,
    /// Nothing that maps to a project changed; everything is rebuilt.
    NoProjectChanges,
}

impl SelectionReason {
    /// Short machine-friendly key.
    pub fn key(&self) -> &'static str {
        match self {
            SelectionReason::RepositoryError { .. } => "fallback-error",
            SelectionReason::InfrastructureChange { .. } => "infra-change",
            SelectionReason::ProjectChanges => "project-change",
            SelectionReason::NoProjectChanges => "fallback-empty",
        }
    }

    /// Whether this reason means every project was selected.
    pub fn selects_all(&self) -> bool {
        !matches!(self, SelectionReason::ProjectChanges)
    }
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionReason::RepositoryError { message } => {
                write!(f, "repository unreadable ({message}); building all projects")
            }
            SelectionReason::InfrastructureChange { path } => {
                write!(f, "'{path}' modified; building all projects")
            }
            SelectionReason::ProjectChanges => write!(f, "building modified projects"),
            SelectionReason::NoProjectChanges => {
                write!(f, "no modified projects; building all projects")
            }
        }
    }
}

/// The projects to build for one invocation, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub projects: Vec<PathBuf>,
    pub reason: SelectionReason,
    /// Top-level paths that were seen as changed, sorted.
    pub dirty: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
