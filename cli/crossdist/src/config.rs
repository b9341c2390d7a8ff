//! `crossdist.toml` parsing and merging with command-line flags.
//!
//! Precedence is flag, then config file, then built-in default.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossdist_dispatch::config::split_extra_args;
use crossdist_dispatch::{BuildMode, RunConfig};
use crossdist_targets::{ArchConvention, ExcludeFilter, Toolchain};
use serde::{Deserialize, Serialize};

/// File name searched for from the working directory upward.
pub const CONFIG_FILE_NAME: &str = "crossdist.toml";

/// The top-level config file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossdistConfig {
    /// Build defaults.
    #[serde(default)]
    pub build: BuildSection,
}

/// `[build]` section. Every key mirrors a command-line flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSection {
    /// Prefix of resulting binaries.
    #[serde(default)]
    pub bin: Option<String>,
    /// Output directory, relative to the config file.
    #[serde(default)]
    pub dist: Option<PathBuf>,
    /// Regex of platforms not to build for.
    #[serde(default)]
    pub exclude: Option<String>,
    /// Extra arguments for the compiler.
    #[serde(default)]
    pub extra_args: Option<String>,
    /// Maximum parallel jobs.
    #[serde(default)]
    pub jobs: Option<NonZeroUsize>,
    /// Use toolchain architecture names.
    #[serde(default)]
    pub goisms: Option<bool>,
    /// Toolchain program.
    #[serde(default)]
    pub toolchain: Option<String>,
}

impl CrossdistConfig {
    /// Search upward from `start_dir` for a `crossdist.toml`, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Load a config file from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a config from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing crossdist.toml")
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct FlagValues {
    pub bin: Option<String>,
    pub dist: Option<PathBuf>,
    pub exclude: Option<String>,
    pub extra_args: Option<String>,
    pub jobs: Option<NonZeroUsize>,
    pub goisms: bool,
    pub toolchain: Option<String>,
}

/// Merge flags over an optional config file into a `RunConfig`.
///
/// `config_dir` is the directory the config file lives in; a relative `dist`
/// from the file is resolved against it.
pub fn resolve(
    flags: FlagValues,
    file: Option<(&CrossdistConfig, &Path)>,
    mode: BuildMode,
) -> Result<RunConfig> {
    let section = file.map(|(c, _)| &c.build).cloned().unwrap_or_default();
    let mut config = RunConfig::new(mode);

    if let Some(bin) = flags.bin.or(section.bin) {
        config.bin_prefix = bin;
    }

    match (flags.dist, section.dist, file) {
        (Some(dist), _, _) => config.dist_dir = dist,
        (None, Some(dist), Some((_, dir))) => config.dist_dir = dir.join(dist),
        _ => {}
    }

    let pattern = flags.exclude.or(section.exclude).unwrap_or_default();
    config.exclude = ExcludeFilter::new(&pattern)?;

    if let Some(raw) = flags.extra_args.or(section.extra_args) {
        config.extra_args = split_extra_args(&raw)?;
    }

    if let Some(jobs) = flags.jobs.or(section.jobs) {
        config.jobs = jobs;
    }

    config.arch_convention =
        ArchConvention::from_toolchain_flag(flags.goisms || section.goisms.unwrap_or(false));

    if let Some(program) = flags.toolchain.or(section.toolchain) {
        config.toolchain = Toolchain::new(program);
    }

    Ok(config)
}
