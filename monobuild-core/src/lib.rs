//! monobuild core library — domain types, layout configuration, errors.
//!
//! - [`types`] — commits, tree entries, change sets, selection results
//! - [`layout`] — reserved names that drive classification and fallbacks
//! - [`error`] — [`LayoutError`]

pub mod error;
pub mod layout;
pub mod types;

pub use error::LayoutError;
pub use layout::Layout;
pub use types::{
    ChangeSet, Commit, CommitId, EntryKind, ProjectDescriptor, SelectionReason, SelectionResult,
    TreeEntry, TreeId, Verdict,
};
