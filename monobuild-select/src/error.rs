//! Error types for monobuild-select.

use thiserror::Error;

use monobuild_core::LayoutError;

/// Failures reading repository history.
///
/// Neither variant aborts selection: both feed the "build everything"
/// fallback in [`crate::policy::select`].
#[derive(Debug, Error)]
pub enum RepoError {
    /// No repository upward of the start directory, no working tree, or no
    /// readable HEAD commit.
    #[error("repository unavailable: {reason}")]
    RepositoryUnavailable { reason: String },

    /// A commit or tree named by the history could not be read.
    #[error("failed to read {what} {id}: {source}")]
    HistoryRead {
        what: &'static str,
        id: String,
        #[source]
        source: git2::Error,
    },
}

/// Errors that stop the selection pipeline before it can fall back.
#[derive(Debug, Error)]
pub enum SelectError {
    /// The layout file exists but could not be loaded.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Convenience constructor for [`RepoError::RepositoryUnavailable`].
pub(crate) fn unavailable(reason: impl Into<String>) -> RepoError {
    RepoError::RepositoryUnavailable {
        reason: reason.into(),
    }
}

/// Convenience constructor for [`RepoError::HistoryRead`].
pub(crate) fn history_err(what: &'static str, id: impl ToString, source: git2::Error) -> RepoError {
    RepoError::HistoryRead {
        what,
        id: id.to_string(),
        source,
    }
}
