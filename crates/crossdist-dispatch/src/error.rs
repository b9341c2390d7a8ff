//! Error types for build dispatch.

use crossdist_targets::Platform;

/// Why a single build job failed.
#[derive(Debug, thiserror::Error)]
pub enum BuildFailure {
    /// The build command could not be started.
    #[error("could not start `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The build command ran and exited unsuccessfully.
    #[error("{}", exit_description(.code))]
    Exited {
        /// Exit code, if the process was not terminated by a signal.
        code: Option<i32>,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Errors that can occur while planning or running builds.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Extra compiler arguments could not be split into words.
    #[error("invalid extra arguments '{0}': unbalanced quotes or trailing escape")]
    ExtraArgs(String),

    /// A build job failed; the run is aborted.
    #[error("could not build for platform {platform}: err={cause}, stdout={stdout}, stderr={stderr}")]
    Build {
        /// Platform whose build failed.
        platform: Platform,
        /// What went wrong.
        cause: BuildFailure,
        /// Captured standard output of the build.
        stdout: String,
        /// Captured standard error of the build.
        stderr: String,
    },

    /// A worker stopped before reporting on every job it was handed.
    #[error("build workers terminated before all jobs completed")]
    WorkerLost,
}

impl DispatchError {
    /// The platform this error concerns, if it is a build failure.
    pub fn platform(&self) -> Option<&Platform> {
        match self {
            Self::Build { platform, .. } => Some(platform),
            _ => None,
        }
    }
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
