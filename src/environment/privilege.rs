//! Privilege checks and re-launching under sudo.
//!
//! Installing packages needs root. A non-root invocation that can use sudo
//! is re-launched as `sudo <this program> <original args>`; the re-launched
//! instance sees an effective uid of 0 and goes straight past the check, so
//! escalation happens at most once.

use std::fmt;

use crate::error::{Result, SnapflatError};
use crate::host::Host;
use crate::shell::Invocation;

/// Privilege level of the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeLevel {
    /// Effective uid 0.
    Root,
    /// Not root, but sudo is installed.
    SudoCapable,
    /// Not root and no way to escalate.
    None,
}

impl fmt::Display for PrivilegeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::SudoCapable => write!(f, "sudo-capable user"),
            Self::None => write!(f, "unprivileged user"),
        }
    }
}

/// Outcome of [`ensure_privilege`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeCheck {
    /// Already root; continue in this process.
    AlreadyRoot,
    /// sudo is authorized; the process must be re-launched under it.
    RelaunchRequired,
}

/// Determine the current privilege level.
pub fn detect_privilege(host: &dyn Host) -> PrivilegeLevel {
    if host.is_root() {
        PrivilegeLevel::Root
    } else if host.has_program("sudo") {
        PrivilegeLevel::SudoCapable
    } else {
        PrivilegeLevel::None
    }
}

/// Make sure the installation can run as root.
///
/// Validates sudo credentials with `sudo -v` (which may prompt for a
/// password) but does not escalate by itself.
pub fn ensure_privilege(host: &dyn Host) -> Result<PrivilegeCheck> {
    let level = detect_privilege(host);
    tracing::debug!("Privilege level: {}", level);

    match level {
        PrivilegeLevel::Root => Ok(PrivilegeCheck::AlreadyRoot),
        PrivilegeLevel::None => Err(SnapflatError::privilege(
            "this program must run as root and sudo is not installed",
        )),
        PrivilegeLevel::SudoCapable => {
            let result = host.run(&Invocation::new("sudo", ["-v"])).map_err(|e| {
                SnapflatError::privilege(format!("could not run sudo: {}", e))
            })?;

            if result.success {
                Ok(PrivilegeCheck::RelaunchRequired)
            } else {
                Err(SnapflatError::privilege(
                    "sudo refused to grant root privileges",
                ))
            }
        }
    }
}

/// Re-invokes the program with escalated privileges.
pub trait Relauncher {
    /// Hand the run over to an escalated instance receiving `args`.
    ///
    /// Returning `Ok` means the escalated instance has taken over and this
    /// instance must do nothing further.
    fn relaunch(&self, args: &[String]) -> Result<()>;
}

/// Replaces the current process with `sudo <current executable> <args>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SudoRelauncher;

impl Relauncher for SudoRelauncher {
    #[cfg(unix)]
    fn relaunch(&self, args: &[String]) -> Result<()> {
        use std::os::unix::process::CommandExt;

        let exe = std::env::current_exe().map_err(|e| SnapflatError::Relaunch {
            message: format!("failed to locate current executable: {}", e),
        })?;

        tracing::info!("Re-launching under sudo: {} {:?}", exe.display(), args);

        // exec only returns on failure
        let err = std::process::Command::new("sudo")
            .arg(&exe)
            .args(args)
            .exec();

        Err(SnapflatError::Relaunch {
            message: err.to_string(),
        })
    }

    #[cfg(not(unix))]
    fn relaunch(&self, _args: &[String]) -> Result<()> {
        Err(SnapflatError::Relaunch {
            message: "re-launching is only supported on Unix".to_string(),
        })
    }
}
