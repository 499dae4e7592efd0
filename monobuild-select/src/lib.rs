//! # monobuild-select
//!
//! Change-impact selection: which projects in a monorepo need a build for
//! the commit at HEAD.
//!
//! Call [`pipeline::run`] for the whole flow, or use the pieces directly:
//! [`RepositoryReader`] → [`changeset::compute`] → [`policy::select`].

pub mod changeset;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod repo;

pub use error::{RepoError, SelectError};
pub use pipeline::{LayoutSource, Selection};
pub use repo::{HeadCommits, RepositoryReader};
