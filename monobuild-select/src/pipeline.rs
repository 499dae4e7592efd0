//! Shared selection entrypoint used by the `select` and `build` commands.

use std::path::{Path, PathBuf};

use monobuild_core::{Layout, SelectionResult};

use crate::{changeset, policy, RepoError, RepositoryReader, SelectError};

/// Where the layout for a run comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LayoutSource {
    /// `<root>/monobuild.yaml` if present, otherwise the defaults.
    #[default]
    Discover,
    /// An explicit file; it must exist.
    File(PathBuf),
    /// An already-built layout.
    Given(Layout),
}

/// Everything a caller needs after selection: the resolved root and layout
/// plus the selection itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Working tree root when a repository was found, otherwise the start directory.
    pub root: PathBuf,
    pub layout: Layout,
    pub result: SelectionResult,
}

/// Run repository read → change set → policy, starting discovery at `start`.
///
/// Repository failures never surface here; they select everything. Only a
/// layout file that exists but cannot be loaded is an error.
pub fn run(start: &Path, layout: LayoutSource) -> Result<Selection, SelectError> {
    let reader = RepositoryReader::from_env(start);
    let root = match &reader {
        Ok(reader) => reader.workdir().to_path_buf(),
        Err(_) => start.to_path_buf(),
    };

    let layout = match layout {
        LayoutSource::Discover => Layout::load_or_default(&root)?,
        LayoutSource::File(path) => {
            let layout = Layout::load(&path)?;
            match top_level_entry(&root, &path) {
                Some(entry) => layout.with_source_entry(entry),
                None => layout,
            }
        }
        LayoutSource::Given(layout) => layout,
    };

    let changes = read_changes(reader);
    let result = policy::select(&root, &layout, changes);
    Ok(Selection {
        root,
        layout,
        result,
    })
}

fn read_changes(
    reader: Result<RepositoryReader, RepoError>,
) -> Result<monobuild_core::ChangeSet, RepoError> {
    let reader = reader?;
    let commits = reader.head_with_parents()?;
    tracing::debug!(
        head = %commits.head.id,
        parents = commits.parents.len(),
        "resolved HEAD"
    );
    changeset::compute(&reader, &commits)
}

/// First component of `file` relative to `root`, when `file` lies inside it.
fn top_level_entry(root: &Path, file: &Path) -> Option<String> {
    let root = root.canonicalize().ok()?;
    let file = file.canonicalize().ok()?;
    let relative = file.strip_prefix(&root).ok()?;
    relative
        .components()
        .next()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
}
