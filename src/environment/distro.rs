//! Distribution family detection from `/etc/os-release`.

use std::fmt;
use std::path::Path;

use crate::host::Host;

/// Location of the OS identification file.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Distribution family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistroFamily {
    /// Debian or a Debian derivative (Ubuntu, Mint, Pop!_OS, ...).
    DebianLike,
    /// Anything else, including a missing os-release file.
    Unknown,
}

impl fmt::Display for DistroFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DebianLike => write!(f, "Debian-like"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Fields of os-release relevant to family detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    /// `ID` field.
    pub id: String,
    /// `ID_LIKE` field (space-separated list, possibly empty).
    pub id_like: String,
    /// `PRETTY_NAME` field, if present.
    pub pretty_name: Option<String>,
}

impl OsRelease {
    /// Parse os-release content.
    pub fn parse(content: &str) -> Self {
        let mut release = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if let Some(val) = line.strip_prefix("ID=") {
                release.id = unquote(val);
            } else if let Some(val) = line.strip_prefix("ID_LIKE=") {
                release.id_like = unquote(val);
            } else if let Some(val) = line.strip_prefix("PRETTY_NAME=") {
                release.pretty_name = Some(unquote(val));
            }
        }

        release
    }

    /// Family of this release.
    ///
    /// Debian-like when `ID` is `debian` or `ID_LIKE` mentions `debian`.
    pub fn family(&self) -> DistroFamily {
        if self.id == "debian" || self.id_like.contains("debian") {
            DistroFamily::DebianLike
        } else {
            DistroFamily::Unknown
        }
    }

    /// Name to show the user.
    pub fn display_name(&self) -> &str {
        match &self.pretty_name {
            Some(name) => name,
            None if !self.id.is_empty() => &self.id,
            None => "unknown distribution",
        }
    }
}

fn unquote(val: &str) -> String {
    val.trim().trim_matches('"').trim_matches('\'').to_string()
}

/// Read and parse os-release. Returns `None` when the file is missing.
pub fn read_os_release(host: &dyn Host) -> Option<OsRelease> {
    host.read_file(Path::new(OS_RELEASE_PATH))
        .map(|content| OsRelease::parse(&content))
}

/// Detect the distribution family.
pub fn detect_distro_family(host: &dyn Host) -> DistroFamily {
    let family = read_os_release(host)
        .map(|release| release.family())
        .unwrap_or(DistroFamily::Unknown);
    tracing::debug!("Distribution family: {}", family);
    family
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FakeHost;

    const UBUNTU: &str = r#"PRETTY_NAME="Ubuntu 24.04.1 LTS"
NAME="Ubuntu"
VERSION_ID="24.04"
VERSION="24.04.1 LTS (Noble Numbat)"
VERSION_CODENAME=noble
ID=ubuntu
ID_LIKE=debian
HOME_URL="https://www.ubuntu.com/"
UBUNTU_CODENAME=noble"#;

    const DEBIAN: &str = r#"PRETTY_NAME="Debian GNU/Linux 12 (bookworm)"
NAME="Debian GNU/Linux"
VERSION_ID="12"
VERSION="12 (bookworm)"
VERSION_CODENAME=bookworm
ID=debian
HOME_URL="https://www.debian.org/""#;

    const MINT: &str = r#"NAME="Linux Mint"
VERSION="22 (Wilma)"
ID=linuxmint
ID_LIKE="ubuntu debian"
PRETTY_NAME="Linux Mint 22""#;

    const FEDORA: &str = r#"NAME="Fedora Linux"
VERSION="40 (Workstation Edition)"
ID=fedora
VERSION_ID=40
PRETTY_NAME="Fedora Linux 40 (Workstation Edition)""#;

    #[test]
    fn debian_is_debian_like() {
        let release = OsRelease::parse(DEBIAN);
        assert_eq!(release.id, "debian");
        assert_eq!(release.family(), DistroFamily::DebianLike);
    }

    #[test]
    fn ubuntu_is_debian_like_via_id_like() {
        let release = OsRelease::parse(UBUNTU);
        assert_eq!(release.id, "ubuntu");
        assert_eq!(release.id_like, "debian");
        assert_eq!(release.family(), DistroFamily::DebianLike);
    }

    #[test]
    fn quoted_id_like_list_is_debian_like() {
        let release = OsRelease::parse(MINT);
        assert_eq!(release.id_like, "ubuntu debian");
        assert_eq!(release.family(), DistroFamily::DebianLike);
    }

    #[test]
    fn fedora_is_unknown() {
        assert_eq!(OsRelease::parse(FEDORA).family(), DistroFamily::Unknown);
    }

    #[test]
    fn match_is_case_sensitive() {
        let release = OsRelease::parse("ID=Debian\nID_LIKE=DEBIAN\n");
        assert_eq!(release.family(), DistroFamily::Unknown);
    }

    #[test]
    fn empty_content_is_unknown() {
        let release = OsRelease::parse("");
        assert_eq!(release.family(), DistroFamily::Unknown);
        assert_eq!(release.display_name(), "unknown distribution");
    }

    #[test]
    fn display_name_prefers_pretty_name() {
        assert_eq!(OsRelease::parse(DEBIAN).display_name(), "Debian GNU/Linux 12 (bookworm)");
        assert_eq!(OsRelease::parse("ID=arch\n").display_name(), "arch");
    }

    #[test]
    fn detect_reads_os_release_from_host() {
        let host = FakeHost::new().with_file(OS_RELEASE_PATH, UBUNTU);
        assert_eq!(detect_distro_family(&host), DistroFamily::DebianLike);
    }

    #[test]
    fn detect_missing_os_release_is_unknown() {
        let host = FakeHost::new();
        assert_eq!(detect_distro_family(&host), DistroFamily::Unknown);
        assert!(read_os_release(&host).is_none());
    }
}
