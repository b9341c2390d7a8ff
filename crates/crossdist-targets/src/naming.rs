//! Artifact naming.
//!
//! Every platform maps to exactly one file in the output directory:
//! `<dist>/<prefix>.<os>-<arch><suffix>`.

use std::path::{Path, PathBuf};

use crate::platform::Platform;

/// How the architecture part of an artifact name is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchConvention {
    /// `uname -m` style names (`x86_64`, `aarch64`, ...).
    #[default]
    Uname,
    /// The toolchain's own tokens (`amd64`, `arm64`, ...).
    Toolchain,
}

impl ArchConvention {
    /// Pick the convention from the "use toolchain names" flag.
    pub fn from_toolchain_flag(use_toolchain_names: bool) -> Self {
        if use_toolchain_names {
            Self::Toolchain
        } else {
            Self::Uname
        }
    }

    /// Spell `arch` in this convention.
    pub fn arch_identifier<'a>(&self, arch: &'a str) -> &'a str {
        match self {
            Self::Uname => uname_arch(arch),
            Self::Toolchain => arch,
        }
    }
}

/// Map a toolchain architecture token to its `uname -m` equivalent.
///
/// Unknown tokens pass through unchanged.
pub fn uname_arch(arch: &str) -> &str {
    match arch {
        "386" => "i686",
        "amd64" => "x86_64",
        // Best effort; real hardware may report armv6l and friends.
        "arm" => "armv7l",
        "arm64" => "aarch64",
        other => other,
    }
}

/// File suffix for binaries built for `platform`.
pub fn binary_suffix(platform: &Platform) -> &'static str {
    if platform.is_windows() {
        ".exe"
    } else if platform.is_wasm() {
        ".wasm"
    } else {
        ""
    }
}

/// Artifact file name for `platform`, without the directory.
pub fn file_name(bin_prefix: &str, platform: &Platform, convention: ArchConvention) -> String {
    format!(
        "{bin_prefix}.{}-{}{}",
        platform.os,
        convention.arch_identifier(&platform.arch),
        binary_suffix(platform)
    )
}

/// Full artifact path for `platform` inside `dist_dir`.
pub fn output_path(
    dist_dir: &Path,
    bin_prefix: &str,
    platform: &Platform,
    convention: ArchConvention,
) -> PathBuf {
    dist_dir.join(file_name(bin_prefix, platform, convention))
}
