//! GUI software store selection.

use std::fmt;

use crate::cli::args::Options;
use crate::host::Host;
use crate::shell::Invocation;

/// A GUI front-end for Snap and Flatpak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiStore {
    GnomeSoftware,
    KdeDiscover,
}

impl GuiStore {
    /// Stores in auto-detection priority order.
    pub const DETECTION_ORDER: [GuiStore; 2] = [GuiStore::GnomeSoftware, GuiStore::KdeDiscover];

    /// Package whose presence means the store is already installed.
    pub fn indicator_package(&self) -> &'static str {
        match self {
            Self::GnomeSoftware => "gnome-software",
            Self::KdeDiscover => "plasma-discover",
        }
    }

    /// Packages installed for this store, including Snap and Flatpak support.
    pub fn packages(&self) -> &'static [&'static str] {
        match self {
            Self::GnomeSoftware => &[
                "gnome-software",
                "gnome-software-plugin-flatpak",
                "gnome-software-plugin-snap",
            ],
            Self::KdeDiscover => &[
                "plasma-discover",
                "plasma-discover-backend-flatpak",
                "plasma-discover-backend-snap",
            ],
        }
    }

    /// Command-line flag selecting this store.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::GnomeSoftware => "--gnome-software",
            Self::KdeDiscover => "--kde-discover",
        }
    }
}

impl fmt::Display for GuiStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GnomeSoftware => write!(f, "GNOME Software"),
            Self::KdeDiscover => write!(f, "KDE Discover"),
        }
    }
}

/// How the store selection was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// Chosen with a command-line flag.
    Flag,
    /// The store's package is already installed.
    Detected,
    /// No flag and nothing installed.
    NoneFound,
}

/// Resolved GUI store selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSelection {
    /// Store to install, if any.
    pub store: Option<GuiStore>,
    /// How it was chosen.
    pub source: SelectionSource,
}

impl StoreSelection {
    /// Informational note for the user, when there is something to say.
    pub fn note(&self) -> Option<String> {
        match (self.source, self.store) {
            (SelectionSource::Detected, Some(store)) => Some(format!(
                "{} is installed; adding Snap and Flatpak support to it",
                store
            )),
            (SelectionSource::NoneFound, _) => Some(format!(
                "No GUI store detected; pass {} or {} to install one",
                GuiStore::GnomeSoftware.flag(),
                GuiStore::KdeDiscover.flag()
            )),
            _ => None,
        }
    }
}

/// Check whether a Debian package is installed.
pub fn is_package_installed(host: &dyn Host, package: &str) -> bool {
    if !host.has_program("dpkg-query") {
        return false;
    }

    let invocation = Invocation::new("dpkg-query", ["-W", "--showformat=${Status}", package]);
    match host.run(&invocation) {
        Ok(result) => result.success && result.stdout.contains("install ok installed"),
        Err(e) => {
            tracing::debug!("Failed to query package {}: {}", package, e);
            false
        }
    }
}

/// First installed store in [`GuiStore::DETECTION_ORDER`].
pub fn detect_installed_store(host: &dyn Host) -> Option<GuiStore> {
    GuiStore::DETECTION_ORDER
        .into_iter()
        .find(|store| is_package_installed(host, store.indicator_package()))
}

/// Resolve which GUI store to install.
///
/// A flag wins; otherwise an installed store is picked up, GNOME first.
pub fn resolve_store_selection(options: &Options, host: &dyn Host) -> StoreSelection {
    let selection = match options.requested_store() {
        Some(store) => StoreSelection {
            store: Some(store),
            source: SelectionSource::Flag,
        },
        None => match detect_installed_store(host) {
            Some(store) => StoreSelection {
                store: Some(store),
                source: SelectionSource::Detected,
            },
            None => StoreSelection {
                store: None,
                source: SelectionSource::NoneFound,
            },
        },
    };

    tracing::debug!("GUI store selection: {:?}", selection);
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FakeHost;
    use crate::shell::CommandResult;

    fn query(package: &str) -> String {
        format!("dpkg-query -W --showformat=${{Status}} {}", package)
    }

    fn installed(host: FakeHost, package: &str) -> FakeHost {
        host.respond(
            &query(package),
            CommandResult::with_stdout("install ok installed"),
        )
    }

    fn not_installed(host: FakeHost, package: &str) -> FakeHost {
        host.respond(
            &query(package),
            CommandResult::failed(1, "dpkg-query: no packages found matching"),
        )
    }

    fn dpkg_host() -> FakeHost {
        FakeHost::new().with_program("dpkg-query")
    }

    #[test]
    fn flag_wins_without_probing() {
        let host = installed(dpkg_host(), "plasma-discover");
        let options = Options {
            gnome_software: true,
            ..Default::default()
        };
        let selection = resolve_store_selection(&options, &host);
        assert_eq!(selection.store, Some(GuiStore::GnomeSoftware));
        assert_eq!(selection.source, SelectionSource::Flag);
        assert!(selection.note().is_none());
        assert!(!host.ran_program("dpkg-query"));
    }

    #[test]
    fn installed_gnome_is_detected() {
        let host = not_installed(installed(dpkg_host(), "gnome-software"), "plasma-discover");
        let selection = resolve_store_selection(&Options::default(), &host);
        assert_eq!(selection.store, Some(GuiStore::GnomeSoftware));
        assert_eq!(selection.source, SelectionSource::Detected);
    }

    #[test]
    fn installed_kde_is_detected() {
        let host = installed(not_installed(dpkg_host(), "gnome-software"), "plasma-discover");
        let selection = resolve_store_selection(&Options::default(), &host);
        assert_eq!(selection.store, Some(GuiStore::KdeDiscover));
        assert!(selection.note().unwrap().contains("KDE Discover"));
    }

    #[test]
    fn gnome_wins_when_both_installed() {
        let host = installed(installed(dpkg_host(), "gnome-software"), "plasma-discover");
        let selection = resolve_store_selection(&Options::default(), &host);
        assert_eq!(selection.store, Some(GuiStore::GnomeSoftware));
        assert!(!host.ran(&query("plasma-discover")));
    }

    #[test]
    fn nothing_installed_is_informational() {
        let host = not_installed(not_installed(dpkg_host(), "gnome-software"), "plasma-discover");
        let selection = resolve_store_selection(&Options::default(), &host);
        assert_eq!(selection.store, None);
        assert_eq!(selection.source, SelectionSource::NoneFound);
        let note = selection.note().unwrap();
        assert!(note.contains("--gnome-software"));
        assert!(note.contains("--kde-discover"));
    }

    #[test]
    fn removed_but_not_purged_is_not_installed() {
        let host = dpkg_host().respond(
            &query("gnome-software"),
            CommandResult::with_stdout("deinstall ok config-files"),
        );
        assert!(!is_package_installed(&host, "gnome-software"));
    }

    #[test]
    fn missing_dpkg_query_means_not_installed() {
        let host = FakeHost::new();
        assert!(!is_package_installed(&host, "gnome-software"));
        assert!(host.runs().is_empty());
    }

    #[test]
    fn store_packages_include_both_backends() {
        for store in GuiStore::DETECTION_ORDER {
            let packages = store.packages();
            assert_eq!(packages[0], store.indicator_package());
            assert!(packages.iter().any(|p| p.contains("flatpak")));
            assert!(packages.iter().any(|p| p.contains("snap")));
        }
    }
}
