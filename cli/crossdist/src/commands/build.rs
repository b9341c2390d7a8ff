//! The build run: query the catalog, then dispatch one build per platform.

use std::fs;

use anyhow::{Context, Result};
use crossdist_dispatch::{DispatchReport, Dispatcher, RunConfig};

/// Build every non-excluded platform the toolchain supports.
pub fn run(config: &RunConfig) -> Result<DispatchReport> {
    let platforms = config
        .toolchain
        .list_platforms()
        .with_context(|| format!("listing platforms with `{}`", config.toolchain.program()))?;
    log::debug!("toolchain reported {} platform(s)", platforms.len());

    fs::create_dir_all(&config.dist_dir)
        .with_context(|| format!("creating {}", config.dist_dir.display()))?;

    let report = Dispatcher::new(config.jobs).dispatch(&platforms, config)?;
    Ok(report)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    use crossdist_dispatch::{BuildMode, DispatchError};
    use crossdist_targets::{ExcludeFilter, Platform, Toolchain};

    const FAKE_TOOLCHAIN: &str = r#"#!/bin/sh
if [ "$1" = "tool" ]; then
  echo '[{"GOOS":"linux","GOARCH":"amd64"},{"GOOS":"windows","GOARCH":"386"},{"GOOS":"js","GOARCH":"wasm"}]'
  exit 0
fi
touch "$3"
"#;

    fn fake_toolchain(dir: &Path) -> Toolchain {
        let path = dir.join("go");
        fs::write(&path, FAKE_TOOLCHAIN).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        Toolchain::new(path.to_string_lossy())
    }

    #[test]
    fn scenario_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RunConfig::new(BuildMode::from_input("main.go", false));
        config.bin_prefix = "app".into();
        config.dist_dir = dir.path().join("out");
        config.exclude = ExcludeFilter::new("windows/.*").unwrap();
        config.toolchain = fake_toolchain(dir.path());

        let report = run(&config).unwrap();
        assert_eq!(report.skipped, vec![Platform::new("windows", "386")]);
        assert!(dir.path().join("out/app.linux-x86_64").is_file());
        assert!(dir.path().join("out/app.js-wasm.wasm").is_file());
        assert!(!dir.path().join("out/app.windows-i686.exe").exists());
    }

    #[test]
    fn missing_toolchain_fails_before_building() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RunConfig::new(BuildMode::from_input("main.go", false));
        config.dist_dir = dir.path().join("out");
        config.toolchain = Toolchain::new(dir.path().join("missing").to_string_lossy());

        let err = run(&config).unwrap_err();
        assert!(format!("{err:#}").contains("listing platforms"));
        assert!(!config.dist_dir.exists());
    }

    #[test]
    fn build_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RunConfig::new(BuildMode::from_input("main.go", false));
        config.dist_dir = dir.path().join("out");
        config.toolchain = fake_toolchain(dir.path());
        config.jobs = std::num::NonZeroUsize::new(3).unwrap();
        config.mode = BuildMode::from_input(r#"[ "$GOOS" != js ]"#, true);

        let err = run(&config).unwrap_err();
        let dispatch = err.downcast_ref::<DispatchError>().unwrap();
        assert_eq!(dispatch.platform(), Some(&Platform::new("js", "wasm")));
    }
}
