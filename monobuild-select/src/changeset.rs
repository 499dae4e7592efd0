//! Shallow tree diff between HEAD and its parents.
//!
//! Only the entries directly under the repository root are compared. A path
//! is changed when it was added, removed or modified (object id or mode)
//! relative to ANY parent, so a merge reports everything that differs from
//! at least one side. A rename shows up as a removal plus an addition.

use std::collections::HashMap;

use monobuild_core::{ChangeSet, TreeEntry};

use crate::error::RepoError;
use crate::repo::{HeadCommits, RepositoryReader};

/// Compute the change set for `commits` by reading their top-level trees.
///
/// A root commit has nothing to compare against and yields an empty set.
/// Tree read failures propagate; the caller decides the fallback.
pub fn compute(reader: &RepositoryReader, commits: &HeadCommits) -> Result<ChangeSet, RepoError> {
    let head = reader.top_level_entries(&commits.head.tree)?;
    let mut parents = Vec::with_capacity(commits.parents.len());
    for parent in &commits.parents {
        parents.push(reader.top_level_entries(&parent.tree)?);
    }
    Ok(diff_entries(&head, &parents))
}

/// Union over `parents` of the top-level paths that differ from `head`.
pub fn diff_entries(head: &[TreeEntry], parents: &[Vec<TreeEntry>]) -> ChangeSet {
    let head_by_path = index_by_path(head);
    let mut changes = ChangeSet::new();

    for parent in parents {
        let parent_by_path = index_by_path(parent);

        for entry in head {
            match parent_by_path.get(entry.path.as_str()) {
                Some(before) if before.same_content(entry) => {}
                _ => changes.insert(entry.path.clone(), entry.kind),
            }
        }
        for entry in parent {
            if !head_by_path.contains_key(entry.path.as_str()) {
                changes.insert(entry.path.clone(), entry.kind);
            }
        }
    }

    changes
}

fn index_by_path(entries: &[TreeEntry]) -> HashMap<&str, &TreeEntry> {
    entries.iter().map(|e| (e.path.as_str(), e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use monobuild_core::EntryKind;

    const DIR: i32 = 0o040000;
    const BLOB: i32 = 0o100644;

    fn dir(path: &str, object: &str) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            kind: EntryKind::Directory,
            object: object.to_string(),
            mode: DIR,
        }
    }

    fn file(path: &str, object: &str) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            kind: EntryKind::File,
            object: object.to_string(),
            mode: BLOB,
        }
    }

    #[test]
    fn no_parents_is_empty() {
        let head = vec![dir("projA", "a1"), file("README.md", "r1")];
        assert!(diff_entries(&head, &[]).is_empty());
    }

    #[test]
    fn identical_trees_are_empty() {
        let head = vec![dir("projA", "a1"), file("README.md", "r1")];
        assert!(diff_entries(&head, &[head.clone()]).is_empty());
    }

    #[test]
    fn modified_added_and_removed_are_reported() {
        let parent = vec![dir("projA", "a1"), dir("projB", "b1"), file("old.txt", "o1")];
        let head = vec![dir("projA", "a2"), dir("projB", "b1"), file("new.txt", "n1")];
        let changes = diff_entries(&head, &[parent]);
        assert_eq!(changes.paths(), vec!["new.txt", "old.txt", "projA"]);
        assert_eq!(changes.kind_of("old.txt"), Some(EntryKind::File));
    }

    #[test]
    fn mode_change_alone_is_a_modification() {
        let parent = vec![file("gradlew", "g1")];
        let mut exec = file("gradlew", "g1");
        exec.mode = 0o100755;
        let changes = diff_entries(&[exec], &[parent]);
        assert!(changes.contains("gradlew"));
    }

    #[test]
    fn rename_flags_both_names() {
        let parent = vec![dir("projA", "a1")];
        let head = vec![dir("projRenamed", "a1")];
        let changes = diff_entries(&head, &[parent]);
        assert_eq!(changes.paths(), vec!["projA", "projRenamed"]);
    }

    #[test]
    fn merge_reports_paths_differing_from_either_parent() {
        let ours = vec![dir("projA", "a2"), dir("projB", "b1"), file("README.md", "r1")];
        let theirs = vec![dir("projA", "a1"), dir("projB", "b2"), file("README.md", "r1")];
        let merged = vec![dir("projA", "a2"), dir("projB", "b2"), file("README.md", "r1")];
        let changes = diff_entries(&merged, &[ours, theirs]);
        assert_eq!(changes.paths(), vec!["projA", "projB"]);
    }

    #[test]
    fn file_replaced_by_directory_keeps_head_kind() {
        let parent = vec![file("builder", "f1")];
        let head = vec![dir("builder", "d1")];
        let changes = diff_entries(&head, &[parent]);
        assert_eq!(changes.kind_of("builder"), Some(EntryKind::Directory));
    }
}
