//! Hints for recognizable command failures.
//!
//! Failure output is matched against a small table of known patterns. The
//! first match supplies a hint shown below the error block.

use regex::Regex;
use std::sync::LazyLock;

use crate::shell::Invocation;

/// A known failure pattern.
struct FailurePattern {
    /// Only applies to this program, or to any program when `None`.
    program: Option<&'static str>,
    regex: Regex,
    hint: &'static str,
}

fn pattern(program: Option<&'static str>, regex: &str, hint: &'static str) -> FailurePattern {
    FailurePattern {
        program,
        regex: Regex::new(regex).expect("failure pattern is valid"),
        hint,
    }
}

static PATTERNS: LazyLock<Vec<FailurePattern>> = LazyLock::new(|| {
    vec![
        pattern(
            Some("apt-get"),
            r"Could not get lock|Unable to acquire the dpkg frontend lock",
            "Another package manager is running. Wait for it to finish and try again.",
        ),
        pattern(
            Some("apt-get"),
            r"dpkg was interrupted",
            "Run 'dpkg --configure -a' to repair the package database, then try again.",
        ),
        pattern(
            Some("apt-get"),
            r"Unable to locate package|has no installation candidate",
            "The package is not available from the configured repositories. Check /etc/apt/sources.list.",
        ),
        pattern(
            None,
            r"Temporary failure resolving|Could not resolve|Network is unreachable",
            "Check the network connection and DNS settings.",
        ),
        pattern(
            Some("snap"),
            r"too early for operation|device not yet seeded",
            "snapd is still seeding. Wait a minute and run 'snap install core'.",
        ),
        pattern(
            Some("snap"),
            r"cannot communicate with server",
            "snapd is not running. Check 'systemctl status snapd.socket'.",
        ),
        pattern(
            Some("flatpak"),
            r"Unable to load summary|Can't fetch summary",
            "Flathub could not be reached. Check the network connection.",
        ),
    ]
});

/// Find a hint for a failed invocation from its output.
pub fn find_hint(invocation: &Invocation, output: &str) -> Option<&'static str> {
    PATTERNS
        .iter()
        .filter(|p| p.program.is_none_or(|program| program == invocation.program))
        .find(|p| p.regex.is_match(output))
        .map(|p| p.hint)
}
