//! Service manager detection.

use std::fmt;

use crate::host::Host;
use crate::shell::Invocation;

/// State of the service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitSystem {
    /// systemd is PID 1 and reports the system as fully running.
    SystemdRunning,
    /// No usable service manager; services must not be enabled or started.
    Absent,
}

impl InitSystem {
    /// Whether services can be enabled and started.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::SystemdRunning)
    }
}

impl fmt::Display for InitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemdRunning => write!(f, "systemd (running)"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

/// Detect the init system.
///
/// `systemctl is-system-running` exits non-zero for every state other than
/// `running`, so only its output is inspected.
pub fn detect_init_system(host: &dyn Host) -> InitSystem {
    if !host.has_program("systemctl") {
        tracing::debug!("systemctl not found on PATH");
        return InitSystem::Absent;
    }

    let state = match host.run(&Invocation::new("systemctl", ["is-system-running"])) {
        Ok(result) => result.stdout.trim().to_string(),
        Err(e) => {
            tracing::debug!("Failed to query systemctl: {}", e);
            return InitSystem::Absent;
        }
    };

    tracing::debug!("systemctl is-system-running: {:?}", state);
    if state == "running" {
        InitSystem::SystemdRunning
    } else {
        InitSystem::Absent
    }
}
