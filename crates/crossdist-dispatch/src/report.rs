//! Outcome of a successful dispatch run.

use std::fmt;
use std::path::PathBuf;

use crossdist_targets::Platform;

/// An artifact whose build command exited successfully.
///
/// In plain mode the file is not checked for; success is the command's exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArtifact {
    /// Platform the artifact was built for.
    pub platform: Platform,
    /// Where the build was told to write it.
    pub output_path: PathBuf,
}

/// Summary of a run where every admitted build succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Built artifacts, ordered by output path.
    pub built: Vec<BuiltArtifact>,
    /// Platforms skipped by the exclusion filter, in catalog order.
    pub skipped: Vec<Platform>,
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Built {} artifact(s), skipped {} platform(s)",
            self.built.len(),
            self.skipped.len()
        )?;
        for artifact in &self.built {
            writeln!(
                f,
                "  {:<20} {}",
                artifact.platform.to_string(),
                artifact.output_path.display()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_artifacts() {
        let report = DispatchReport {
            built: vec![BuiltArtifact {
                platform: Platform::new("linux", "amd64"),
                output_path: PathBuf::from("out/app.linux-x86_64"),
            }],
            skipped: vec![Platform::new("windows", "386")],
        };
        let text = report.to_string();
        assert!(text.starts_with("Built 1 artifact(s), skipped 1 platform(s)"));
        assert!(text.contains("linux/amd64"));
        assert!(text.contains("out/app.linux-x86_64"));
        assert!(!text.contains("windows/386"));
    }
}
