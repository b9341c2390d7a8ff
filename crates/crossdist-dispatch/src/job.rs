//! Build jobs and the commands they run.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use crossdist_targets::{naming, Platform, TARGET_ARCH_ENV, TARGET_OS_ENV};

use crate::config::{BuildMode, RunConfig};
use crate::DESTINATION_ENV;

/// A subprocess invocation: program, argument vector, and environment overrides.
///
/// Overrides are layered on top of the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute.
    pub program: String,
    /// Arguments, passed as data and never re-parsed by a shell.
    pub args: Vec<String>,
    /// Environment variables set in addition to the inherited ones.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Value of an environment override, if set.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{key}={value} ")?;
        }
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// The host shell used for plain-mode commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostShell {
    /// Shell program.
    pub program: String,
    /// Flag that makes the shell run its next argument as a command line.
    pub flag: String,
}

impl HostShell {
    /// PowerShell on Windows hosts; otherwise bash if installed, else `sh`.
    pub fn detect() -> Self {
        if cfg!(windows) {
            return Self::new("powershell", "-command");
        }
        match which::which("bash") {
            Ok(bash) => Self::new(bash.to_string_lossy(), "-c"),
            Err(_) => Self::new("sh", "-c"),
        }
    }

    /// A shell invoked as `<program> <flag> <command>`.
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }
}

/// One build for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildJob {
    /// Platform being built.
    pub platform: Platform,
    /// Where the artifact is written.
    pub output_path: PathBuf,
    /// What runs.
    pub command: CommandSpec,
}

impl BuildJob {
    /// Build the job for `platform` under `config`.
    ///
    /// Exclusion is not consulted here; callers decide whether to plan a job.
    pub fn new(platform: &Platform, config: &RunConfig, shell: &HostShell) -> Self {
        let output_path = naming::output_path(
            &config.dist_dir,
            &config.bin_prefix,
            platform,
            config.arch_convention,
        );

        let mut env = vec![
            (TARGET_OS_ENV.to_string(), quote(&platform.os).into_owned()),
            (TARGET_ARCH_ENV.to_string(), quote(&platform.arch).into_owned()),
        ];

        let command = match &config.mode {
            BuildMode::Toolchain { entry } => {
                let mut args = vec!["build".to_string(), "-o".to_string(), path_arg(&output_path)];
                args.extend(config.extra_args.iter().cloned());
                args.push(entry.clone());
                CommandSpec {
                    program: config.toolchain.program().to_string(),
                    args,
                    env,
                }
            }
            BuildMode::Plain { command } => {
                env.push((
                    DESTINATION_ENV.to_string(),
                    quote(&path_arg(&output_path)).into_owned(),
                ));
                CommandSpec {
                    program: shell.program.clone(),
                    args: vec![shell.flag.clone(), command.clone()],
                    env,
                }
            }
        };

        Self {
            platform: platform.clone(),
            output_path,
            command,
        }
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Shell-quote `s`, leaving it untouched when it needs no quoting.
fn quote(s: &str) -> Cow<'_, str> {
    shlex::try_quote(s).unwrap_or(Cow::Borrowed(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn sh() -> HostShell {
        HostShell::new("/bin/sh", "-c")
    }

    #[test]
    fn toolchain_command() {
        let mut config = RunConfig::new(BuildMode::from_input("./cmd/app", false));
        config.bin_prefix = "app".into();
        config.extra_args = vec!["-trimpath".into(), "-ldflags=-s -w".into()];
        config.jobs = NonZeroUsize::new(4).unwrap();

        let job = BuildJob::new(&Platform::new("linux", "amd64"), &config, &sh());
        let expected_path = Path::new("out").join("app.linux-x86_64");
        assert_eq!(job.output_path, expected_path);
        assert_eq!(job.command.program, "go");
        assert_eq!(
            job.command.args,
            vec![
                "build".to_string(),
                "-o".to_string(),
                expected_path.to_string_lossy().into_owned(),
                "-trimpath".to_string(),
                "-ldflags=-s -w".to_string(),
                "./cmd/app".to_string(),
            ]
        );
        assert_eq!(job.command.env_var("GOOS"), Some("linux"));
        assert_eq!(job.command.env_var("GOARCH"), Some("amd64"));
        assert_eq!(job.command.env_var("DST"), None);
    }

    #[test]
    fn entry_with_spaces_is_one_argument() {
        let config = RunConfig::new(BuildMode::from_input("my dir/main.go", false));
        let job = BuildJob::new(&Platform::new("darwin", "arm64"), &config, &sh());
        assert_eq!(job.command.args.last().map(String::as_str), Some("my dir/main.go"));
        assert_eq!(job.command.args.len(), 4);
    }

    #[test]
    fn plain_command() {
        let config = RunConfig::new(BuildMode::from_input("go build -o $DST main.go", true));
        let job = BuildJob::new(&Platform::new("windows", "386"), &config, &sh());
        assert_eq!(job.command.program, "/bin/sh");
        assert_eq!(job.command.args, vec!["-c", "go build -o $DST main.go"]);
        assert_eq!(job.command.env_var("GOOS"), Some("windows"));
        assert_eq!(job.command.env_var("GOARCH"), Some("386"));
        let dst = Path::new("out").join("mybin.windows-i686.exe");
        assert_eq!(
            job.command.env_var("DST").map(str::to_string),
            Some(dst.to_string_lossy().into_owned())
        );
    }

    #[test]
    fn plain_destination_is_quoted() {
        let mut config = RunConfig::new(BuildMode::from_input("true", true));
        config.dist_dir = PathBuf::from("my out");
        let job = BuildJob::new(&Platform::new("linux", "arm64"), &config, &sh());
        let dst = job.command.env_var("DST").unwrap();
        assert!(dst.starts_with('\'') || dst.starts_with('"'), "{dst}");
        assert!(dst.contains("mybin.linux-aarch64"));
    }

    #[test]
    fn custom_toolchain() {
        let mut config = RunConfig::new(BuildMode::from_input("main.go", false));
        config.toolchain = crossdist_targets::Toolchain::new("/opt/go/bin/go");
        let job = BuildJob::new(&Platform::new("linux", "amd64"), &config, &sh());
        assert_eq!(job.command.program, "/opt/go/bin/go");
    }

    #[test]
    fn display_quotes_arguments() {
        let spec = CommandSpec {
            program: "go".into(),
            args: vec!["build".into(), "my dir/main.go".into()],
            env: vec![("GOOS".into(), "linux".into())],
        };
        let shown = spec.to_string();
        assert!(shown.starts_with("GOOS=linux go build "), "{shown}");
        assert!(shown.contains("my dir/main.go"));
        assert!(!shown.ends_with(" my dir/main.go"), "{shown}");
    }

    #[cfg(unix)]
    #[test]
    fn detect_prefers_a_posix_shell() {
        let shell = HostShell::detect();
        assert_eq!(shell.flag, "-c");
        assert!(shell.program.ends_with("bash") || shell.program == "sh");
    }
}
