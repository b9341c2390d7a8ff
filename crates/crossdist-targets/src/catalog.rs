//! Platform catalog: the list of targets the toolchain can build for.
//!
//! The catalog is queried once per run, before any build starts. A failed
//! or unparseable query is fatal; there is no partial catalog.

use std::process::Command;

use crate::error::{Result, TargetError};
use crate::platform::Platform;

/// Arguments that make the toolchain print its supported targets as JSON.
const LIST_TARGETS_ARGS: &[&str] = &["tool", "dist", "list", "-json"];

/// Handle to the external toolchain program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    program: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new("go")
    }
}

impl Toolchain {
    /// Use `program` (looked up on `PATH` if not a path) as the toolchain.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The toolchain program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Query the toolchain for every platform it supports.
    ///
    /// Platforms are returned in the order the toolchain reports them.
    pub fn list_platforms(&self) -> Result<Vec<Platform>> {
        log::debug!("querying platforms: {} {}", self.program, LIST_TARGETS_ARGS.join(" "));

        let output = Command::new(&self.program)
            .args(LIST_TARGETS_ARGS)
            .output()
            .map_err(|source| TargetError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TargetError::Query {
                status: output.status,
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        parse_catalog(&output.stdout)
    }
}

/// Parse the toolchain's JSON platform list.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Platform>> {
    let platforms: Vec<Platform> = serde_json::from_slice(bytes)?;
    Ok(platforms)
}
