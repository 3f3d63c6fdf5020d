//! Error types for snapflat operations.
//!
//! This module defines [`SnapflatError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Gatekeeper failures (`Config`, `Privilege`, `UnsupportedEnvironment`) are
//!   terminal and are reported verbatim to the user
//! - Installation failures carry the command line and its stderr
//! - Use `anyhow::Error` (via `SnapflatError::Other`) for unexpected errors
//!
//! Every variant maps to a process exit code through [`SnapflatError::exit_code`].

use thiserror::Error;

/// Exit code for privilege, environment and installation failures.
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for argument and configuration errors.
pub const EXIT_CONFIG: u8 = 2;

/// Core error type for snapflat operations.
#[derive(Debug, Error)]
pub enum SnapflatError {
    /// Bad or contradictory command-line arguments.
    #[error("Invalid arguments: {message}")]
    Config { message: String },

    /// Not running as root and unable (or not allowed) to escalate.
    #[error("Insufficient privileges: {message}")]
    Privilege { message: String },

    /// Running inside WSL or a container.
    #[error("Unsupported environment: {reason}")]
    UnsupportedEnvironment { reason: String },

    /// Re-launching under sudo failed.
    #[error("Failed to re-launch with sudo: {message}")]
    Relaunch { message: String },

    /// An installation command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnapflatError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a privilege error.
    pub fn privilege(message: impl Into<String>) -> Self {
        Self::Privilege {
            message: message.into(),
        }
    }

    /// Create an unsupported-environment error.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedEnvironment {
            reason: reason.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config { .. } => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}

/// Result type alias for snapflat operations.
pub type Result<T> = std::result::Result<T, SnapflatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_message() {
        let err = SnapflatError::config("unexpected argument '--foo'");
        assert!(err.to_string().contains("--foo"));
    }

    #[test]
    fn privilege_error_displays_message() {
        let err = SnapflatError::privilege("sudo is not installed");
        assert!(err.to_string().contains("sudo is not installed"));
    }

    #[test]
    fn unsupported_environment_displays_reason() {
        let err = SnapflatError::unsupported("docker container detected");
        let msg = err.to_string();
        assert!(msg.contains("Unsupported environment"));
        assert!(msg.contains("docker"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SnapflatError::CommandFailed {
            command: "snap install core".into(),
            code: Some(1),
            stderr: "too early for operation".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("snap install core"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn config_errors_exit_with_two() {
        assert_eq!(SnapflatError::config("x").exit_code(), 2);
    }

    #[test]
    fn gating_errors_exit_with_one() {
        assert_eq!(SnapflatError::privilege("x").exit_code(), 1);
        assert_eq!(SnapflatError::unsupported("x").exit_code(), 1);
        let relaunch = SnapflatError::Relaunch {
            message: "exec failed".into(),
        };
        assert_eq!(relaunch.exit_code(), 1);
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SnapflatError = io_err.into();
        assert!(matches!(err, SnapflatError::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(SnapflatError::config("test"))
        }
        assert!(returns_error().is_err());
    }
}
