//! Build dispatch for crossdist.
//!
//! Turns a platform catalog into one build job per non-excluded platform and
//! runs those jobs on a fixed-size worker pool. The first failing job stops
//! further admissions; jobs already running are allowed to finish.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod job;
pub mod report;
pub mod runner;

pub use config::{BuildMode, RunConfig};
pub use dispatcher::{Dispatcher, Plan};
pub use error::{BuildFailure, DispatchError, Result};
pub use job::{BuildJob, CommandSpec, HostShell};
pub use report::{BuiltArtifact, DispatchReport};
pub use runner::{CapturedOutput, JobRunner, SystemRunner};

/// Environment variable carrying the artifact path in plain mode.
pub const DESTINATION_ENV: &str = "DST";
