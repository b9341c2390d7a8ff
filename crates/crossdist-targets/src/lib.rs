//! Target platform model for crossdist.
//!
//! Everything here is independent of how builds are scheduled:
//! - **Catalog:** ask the toolchain which (OS, architecture) pairs it supports
//! - **Naming:** derive the artifact path for a platform
//! - **Exclusion:** decide whether a platform is skipped

pub mod catalog;
pub mod error;
pub mod exclude;
pub mod naming;
pub mod platform;

pub use catalog::Toolchain;
pub use error::{Result, TargetError};
pub use exclude::ExcludeFilter;
pub use naming::{output_path, ArchConvention};
pub use platform::Platform;

/// Environment variable the toolchain reads the target OS from.
pub const TARGET_OS_ENV: &str = "GOOS";

/// Environment variable the toolchain reads the target architecture from.
pub const TARGET_ARCH_ENV: &str = "GOARCH";
