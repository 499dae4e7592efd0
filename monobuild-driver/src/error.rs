//! Error types for monobuild-driver.

use std::path::PathBuf;

use thiserror::Error;

/// Failures launching the build tool. A task that runs and exits non-zero is
/// not an error here; it is a [`crate::TaskStatus::Failed`].
#[derive(Debug, Error)]
pub enum DriverError {
    /// The build tool process could not be started.
    #[error("failed to launch {program} in {project}: {source}")]
    Spawn {
        program: String,
        project: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
