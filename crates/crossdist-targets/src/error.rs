//! Error types for target platform operations.

use std::process::ExitStatus;

/// Errors that can occur while loading or filtering target platforms.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// The toolchain could not be started.
    #[error("could not run `{program}`")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The platform query exited unsuccessfully.
    #[error("could not query supported platforms: status={status}, stdout={stdout}, stderr={stderr}")]
    Query {
        /// Exit status of the query.
        status: ExitStatus,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The platform query printed something that is not a platform list.
    #[error("could not parse supported platforms: {0}")]
    Catalog(#[from] serde_json::Error),

    /// The exclusion pattern is not a valid regular expression.
    #[error("invalid exclude pattern '{pattern}'")]
    Pattern {
        /// The pattern as supplied.
        pattern: String,
        /// Compilation error from the regex engine.
        source: regex::Error,
    },
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
