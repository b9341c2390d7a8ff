//! A single buildable (OS, architecture) pair.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A target platform as reported by the toolchain.
///
/// Deserializes from the toolchain's `{"GOOS": .., "GOARCH": ..}` records;
/// any other fields in a record are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system token (e.g., "linux", "windows", "js").
    #[serde(rename = "GOOS")]
    pub os: String,
    /// Architecture token (e.g., "amd64", "arm64", "wasm").
    #[serde(rename = "GOARCH")]
    pub arch: String,
}

impl Platform {
    /// Construct a platform from its OS and architecture tokens.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The `os/arch` string exclusion patterns are matched against.
    pub fn pair(&self) -> String {
        format!("{}/{}", self.os, self.arch)
    }

    /// Whether this platform produces Windows executables.
    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// Whether this platform produces a browser WebAssembly module.
    pub fn is_wasm(&self) -> bool {
        self.os == "js" && self.arch == "wasm"
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
