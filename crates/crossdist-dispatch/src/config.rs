//! Run configuration: the immutable options a dispatch run is driven by.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use crossdist_targets::{ArchConvention, ExcludeFilter, Toolchain};

use crate::error::{DispatchError, Result};

/// What each build job executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
    /// Invoke `<toolchain> build` on an entry point.
    Toolchain {
        /// Source entry point handed to the build command.
        entry: String,
    },
    /// Run a literal shell command line, trusted as-is.
    Plain {
        /// Command line passed to the host shell unmodified.
        command: String,
    },
}

impl BuildMode {
    /// Select the mode from the plain-mode flag and the positional input.
    pub fn from_input(input: impl Into<String>, plain: bool) -> Self {
        if plain {
            Self::Plain {
                command: input.into(),
            }
        } else {
            Self::Toolchain {
                entry: input.into(),
            }
        }
    }
}

/// All user-supplied options for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Prefix of every artifact file name.
    pub bin_prefix: String,
    /// Directory artifacts are written into.
    pub dist_dir: PathBuf,
    /// Platforms to skip.
    pub exclude: ExcludeFilter,
    /// Extra compiler arguments, inserted before the entry point.
    pub extra_args: Vec<String>,
    /// Maximum number of concurrently running builds.
    pub jobs: NonZeroUsize,
    /// Spelling of the architecture in artifact names.
    pub arch_convention: ArchConvention,
    /// What each job runs.
    pub mode: BuildMode,
    /// Toolchain used for the catalog query and normal-mode builds.
    pub toolchain: Toolchain,
}

impl RunConfig {
    /// Defaults for everything but the build mode.
    pub fn new(mode: BuildMode) -> Self {
        Self {
            bin_prefix: "mybin".to_string(),
            dist_dir: PathBuf::from("out"),
            exclude: ExcludeFilter::default(),
            extra_args: Vec::new(),
            jobs: NonZeroUsize::MIN,
            arch_convention: ArchConvention::Uname,
            mode,
            toolchain: Toolchain::default(),
        }
    }
}

/// Split an extra-arguments string into words using shell quoting rules.
///
/// An empty or all-whitespace string yields no arguments.
pub fn split_extra_args(raw: &str) -> Result<Vec<String>> {
    shlex::split(raw).ok_or_else(|| DispatchError::ExtraArgs(raw.to_string()))
}
