//! Read-only access to the repository: discovery, HEAD and its parents, and
//! the top level of a tree.

use std::path::{Path, PathBuf};

use git2::{ObjectType, Oid, Repository};

use monobuild_core::{Commit, CommitId, EntryKind, TreeEntry, TreeId};

use crate::error::{history_err, unavailable, RepoError};

/// Environment variable that, when set, switches discovery to the `GIT_*`
/// environment (`GIT_DIR`, `GIT_WORK_TREE`, `GIT_CEILING_DIRECTORIES`).
pub const GIT_DIR_ENV: &str = "GIT_DIR";

/// The head commit together with every parent it records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadCommits {
    pub head: Commit,
    /// Parents in recorded order; empty for a root commit.
    pub parents: Vec<Commit>,
}

/// An opened repository with a working tree.
pub struct RepositoryReader {
    repo: Repository,
    workdir: PathBuf,
}

impl std::fmt::Debug for RepositoryReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryReader")
            .field("workdir", &self.workdir)
            .finish_non_exhaustive()
    }
}

impl RepositoryReader {
    /// Search upward from `start` for git metadata.
    pub fn discover(start: &Path) -> Result<Self, RepoError> {
        let repo = Repository::discover(start).map_err(|e| {
            unavailable(format!("no git repository at or above {}: {}", start.display(), e.message()))
        })?;
        Self::from_repository(repo)
    }

    /// Like [`discover`](Self::discover), but defers to the `GIT_*`
    /// environment when `GIT_DIR` is set.
    pub fn from_env(start: &Path) -> Result<Self, RepoError> {
        if std::env::var_os(GIT_DIR_ENV).is_none() {
            return Self::discover(start);
        }
        let repo = Repository::open_from_env()
            .map_err(|e| unavailable(format!("cannot open repository from environment: {}", e.message())))?;
        Self::from_repository(repo)
    }

    fn from_repository(repo: Repository) -> Result<Self, RepoError> {
        let Some(workdir) = repo.workdir().map(Path::to_path_buf) else {
            return Err(unavailable(format!(
                "repository at {} has no working tree",
                repo.path().display()
            )));
        };
        Ok(Self { repo, workdir })
    }

    /// Root of the working tree; its immediate children are candidate projects.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Resolve HEAD to a commit and read each of its parents.
    pub fn head_with_parents(&self) -> Result<HeadCommits, RepoError> {
        let head_ref = self
            .repo
            .head()
            .map_err(|e| unavailable(format!("cannot resolve HEAD: {}", e.message())))?;
        let head = head_ref
            .peel_to_commit()
            .map_err(|e| unavailable(format!("HEAD does not point at a commit: {}", e.message())))?;

        let mut parents = Vec::with_capacity(head.parent_count());
        for id in head.parent_ids() {
            let parent = self
                .repo
                .find_commit(id)
                .map_err(|e| history_err("commit", id, e))?;
            parents.push(to_commit(&parent));
        }

        Ok(HeadCommits {
            head: to_commit(&head),
            parents,
        })
    }

    /// Entries directly under the root of `tree`, without descending.
    pub fn top_level_entries(&self, tree: &TreeId) -> Result<Vec<TreeEntry>, RepoError> {
        let oid = Oid::from_str(&tree.0).map_err(|e| history_err("tree", tree, e))?;
        let tree_obj = self.repo.find_tree(oid).map_err(|e| history_err("tree", tree, e))?;

        Ok(tree_obj
            .iter()
            .map(|entry| TreeEntry {
                path: String::from_utf8_lossy(entry.name_bytes()).into_owned(),
                kind: entry_kind(entry.kind()),
                object: entry.id().to_string(),
                mode: entry.filemode(),
            })
            .collect())
    }
}

fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    Commit {
        id: CommitId(commit.id().to_string()),
        tree: TreeId(commit.tree_id().to_string()),
        parents: commit.parent_ids().map(|id| CommitId(id.to_string())).collect(),
    }
}

fn entry_kind(kind: Option<ObjectType>) -> EntryKind {
    match kind {
        Some(ObjectType::Tree) => EntryKind::Directory,
        Some(ObjectType::Commit) => EntryKind::Submodule,
        _ => EntryKind::File,
    }
}
