//! Access to the machine snapflat runs on.
//!
//! Every probe and every mutating action goes through the [`Host`] trait:
//! - [`SystemHost`] talks to the real system
//! - [`FakeHost`] is an in-memory stand-in that records what was asked of it
//!
//! # Example
//!
//! ```
//! use snapflat::host::{FakeHost, Host};
//!
//! let host = FakeHost::new()
//!     .with_program("systemctl")
//!     .with_file("/etc/os-release", "ID=debian\n");
//!
//! assert!(host.has_program("systemctl"));
//! assert!(!host.has_program("sudo"));
//! assert_eq!(
//!     host.read_file("/etc/os-release".as_ref()).as_deref(),
//!     Some("ID=debian\n")
//! );
//! ```

pub mod fake;

pub use fake::FakeHost;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::shell::{self, CommandResult, Invocation};

/// Side effects the gatekeeper and installer depend on.
pub trait Host {
    /// Whether the effective user is the super-user.
    fn is_root(&self) -> bool;

    /// Locate an executable on PATH.
    fn find_program(&self, name: &str) -> Option<PathBuf>;

    /// Read an environment variable.
    fn env_var(&self, key: &str) -> Option<String>;

    /// Read a file to a string. Missing or unreadable files yield `None`.
    fn read_file(&self, path: &Path) -> Option<String>;

    /// Whether anything (file, directory, symlink target) exists at `path`.
    fn path_exists(&self, path: &Path) -> bool;

    /// Run a program to completion, capturing its output.
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;

    /// Create a symbolic link at `link` pointing to `target`.
    fn symlink(&self, target: &Path, link: &Path) -> Result<()>;

    /// Block the current thread.
    fn sleep(&self, duration: Duration);

    /// Whether a program is available on PATH.
    fn has_program(&self, name: &str) -> bool {
        self.find_program(name).is_some()
    }
}

/// [`Host`] backed by the running system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl SystemHost {
    /// Create a host for the running system.
    pub fn new() -> Self {
        Self
    }
}

impl Host for SystemHost {
    fn is_root(&self) -> bool {
        shell::is_elevated()
    }

    fn find_program(&self, name: &str) -> Option<PathBuf> {
        shell::resolve_tool_path(name, &shell::parse_system_path())
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists() || path.symlink_metadata().is_ok()
    }

    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        tracing::debug!("Running: {}", invocation);
        let result = shell::execute(invocation)?;
        tracing::debug!(
            "Finished: {} (exit {:?}, {:?})",
            invocation,
            result.exit_code,
            result.duration
        );
        Ok(result)
    }

    #[cfg(unix)]
    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        std::os::unix::fs::symlink(target, link)?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn symlink(&self, _target: &Path, _link: &Path) -> Result<()> {
        Err(anyhow::anyhow!("symbolic links are only supported on Unix").into())
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
