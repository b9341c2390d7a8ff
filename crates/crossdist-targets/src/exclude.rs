//! Exclusion of platforms by regular expression.

use regex::Regex;

use crate::error::{Result, TargetError};
use crate::platform::Platform;

/// A compiled exclusion pattern over `os/arch` strings.
///
/// The pattern is searched for anywhere in the string, not anchored.
/// An empty pattern excludes nothing.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    regex: Option<Regex>,
}

impl ExcludeFilter {
    /// Compile `pattern`. Fails on a malformed expression.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Ok(Self::default());
        }
        let regex = Regex::new(pattern).map_err(|source| TargetError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex: Some(regex) })
    }

    /// The pattern as supplied, or `""` when nothing is excluded.
    pub fn pattern(&self) -> &str {
        self.regex.as_ref().map(Regex::as_str).unwrap_or("")
    }

    /// Whether `platform` should be skipped.
    pub fn should_skip(&self, platform: &Platform) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(&platform.pair()),
            None => false,
        }
    }
}
