//! Error types for monobuild-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading a layout file.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Underlying I/O failure (permission denied, not a file, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse layout at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The layout file named explicitly did not exist.
    #[error("layout file not found at {path}")]
    NotFound { path: PathBuf },

    /// A reserved name was empty or contained a path separator.
    #[error("invalid layout value for `{field}`: '{value}' must be a single non-empty path segment")]
    InvalidName { field: &'static str, value: String },
}
