//! crossdist CLI — build one program for every platform its toolchain supports.

mod commands;
mod config;
mod logging;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser};
use crossdist_dispatch::BuildMode;

use config::{CrossdistConfig, FlagValues};

const EXAMPLES: &str = "\
Example usage: crossdist -b mybin -x '(android/arm$|ios/*|openbsd/mips64)' -j $(nproc) 'main.go'
Example usage (with plain flag): crossdist -b mybin -x '(android/arm$|ios/*|openbsd/mips64)' -j $(nproc) -p 'go build -o $DST main.go'";

const MISSING_INPUT: &str = "command needs an argument: 'INPUT'";

#[derive(Parser)]
#[command(
    name = "crossdist",
    version,
    about = "Build for all toolchain-supported platforms by default, disable those which you don't want.",
    override_usage = "crossdist [OPTION...] '<INPUT>'",
    after_help = EXAMPLES
)]
struct Cli {
    /// Prefix of resulting binary [default: mybin]
    #[arg(short = 'b', long)]
    bin: Option<String>,
    /// Directory build into [default: out]
    #[arg(short = 'd', long)]
    dist: Option<PathBuf>,
    /// Regex of platforms not to build for, i.e. (windows/386|linux/mips64)
    #[arg(short = 'x', long)]
    exclude: Option<String>,
    /// Extra arguments to pass to the compiler
    #[arg(short = 'e', long, allow_hyphen_values = true)]
    extra_args: Option<String>,
    /// Maximum amount of parallel jobs [default: 1]
    #[arg(short = 'j', long)]
    jobs: Option<NonZeroUsize>,
    /// Use the toolchain's conventions (i.e. amd64) instead of uname's conventions (i.e. x86_64)
    #[arg(short = 'g', long)]
    goisms: bool,
    /// Sets GOOS, GOARCH and DST and leaves the rest up to you (see example usage)
    #[arg(short = 'p', long)]
    plain: bool,
    /// Toolchain program used to list platforms and build [default: go]
    #[arg(long)]
    toolchain: Option<String>,
    /// Config file to read instead of searching for crossdist.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Entry point to build, or a shell command line with --plain
    input: Option<String>,
}

impl Cli {
    fn flag_values(&self) -> FlagValues {
        FlagValues {
            bin: self.bin.clone(),
            dist: self.dist.clone(),
            exclude: self.exclude.clone(),
            extra_args: self.extra_args.clone(),
            jobs: self.jobs,
            goisms: self.goisms,
            toolchain: self.toolchain.clone(),
        }
    }
}

fn main() {
    logging::init();

    let cli = Cli::parse();

    let Some(input) = cli.input.clone() else {
        exit_missing_input();
    };

    let result = run(&cli, input);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Report a missing INPUT the way the usage error has always looked:
/// message, usage text, message again.
fn exit_missing_input() -> ! {
    println!("{MISSING_INPUT}");
    if let Err(e) = Cli::command().print_help() {
        eprintln!("error: {e}");
    }
    println!("{MISSING_INPUT}");
    process::exit(2);
}

fn run(cli: &Cli, input: String) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let report = execute(cli, input, &cwd)?;
    print!("{report}");
    Ok(())
}

fn execute(
    cli: &Cli,
    input: String,
    cwd: &Path,
) -> anyhow::Result<crossdist_dispatch::DispatchReport> {
    let file = load_config(cli.config.as_deref(), cwd)?;
    let file_ref = file.as_ref().map(|(c, dir)| (c, dir.as_path()));
    let mode = BuildMode::from_input(input, cli.plain);
    let config = config::resolve(cli.flag_values(), file_ref, mode)?;
    commands::build::run(&config)
}

/// Load the explicit config file, or search upward from `cwd`.
fn load_config(
    explicit: Option<&Path>,
    cwd: &Path,
) -> anyhow::Result<Option<(CrossdistConfig, PathBuf)>> {
    match explicit {
        Some(path) => {
            let config = CrossdistConfig::load(path)?;
            let dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            Ok(Some((config, dir)))
        }
        None => CrossdistConfig::find_and_load(cwd),
    }
}


#[cfg(all(test, unix))]
mod integration_tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const FAKE_TOOLCHAIN: &str = r#"#!/bin/sh
if [ "$1" = "tool" ]; then
  echo '[{"GOOS":"linux","GOARCH":"amd64"},{"GOOS":"linux","GOARCH":"arm"},{"GOOS":"windows","GOARCH":"amd64"},{"GOOS":"js","GOARCH":"wasm"}]'
  exit 0
fi
echo "$GOOS/$GOARCH" > "$3"
"#;

    /// Project with a config file and a fake toolchain; CLI flags on top.
    #[test]
    fn config_file_and_flags_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = dir.path().join("fake-go");
        std::fs::write(&toolchain, FAKE_TOOLCHAIN).unwrap();
        let mut perms = std::fs::metadata(&toolchain).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&toolchain, perms).unwrap();

        std::fs::write(
            dir.path().join(config::CONFIG_FILE_NAME),
            format!(
                "[build]\nbin = \"tool\"\ndist = \"dist\"\njobs = 2\ntoolchain = \"{}\"\n",
                toolchain.display()
            ),
        )
        .unwrap();
        let nested = dir.path().join("cmd");
        std::fs::create_dir_all(&nested).unwrap();

        let cli = Cli::try_parse_from(["crossdist", "-x", "^windows/", "main.go"]).unwrap();
        let report = execute(&cli, "main.go".into(), &nested).unwrap();

        assert_eq!(report.built.len(), 3);
        assert_eq!(report.skipped.len(), 1);
        let dist = dir.path().join("dist");
        assert_eq!(
            std::fs::read_to_string(dist.join("tool.linux-armv7l")).unwrap().trim(),
            "linux/arm"
        );
        assert!(dist.join("tool.linux-x86_64").is_file());
        assert!(dist.join("tool.js-wasm.wasm").is_file());
        assert!(!dist.join("tool.windows-x86_64.exe").exists());
    }
}
