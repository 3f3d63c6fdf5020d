//! Pre-installation gate.
//!
//! [`Gatekeeper::run`] evaluates the environment once, in a fixed order,
//! and decides whether installation may proceed:
//!
//! 1. parse options (help and argument errors end here)
//! 2. privilege (root continues, sudo-capable asks for a re-launch)
//! 3. virtualization (WSL and containers abort)
//! 4. distribution family (non-Debian only warns)
//! 5. GUI store selection
//! 6. init system (absence only warns)
//!
//! Nothing on the machine is modified here.

use crate::cli::args::{parse_options, Options, ParseOutcome};
use crate::environment::{
    detect_init_system, detect_virtualization, ensure_privilege, read_os_release, resolve_store_selection, DistroFamily, GuiStore, PrivilegeCheck,
};
use crate::error::{Result, SnapflatError};
use crate::host::Host;
use crate::ui::UserInterface;

/// Configuration handed to the installer.
///
/// Never selects both GUI stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallConfig {
    /// Install GNOME Software with its Snap and Flatpak plugins.
    pub install_gnome_software: bool,
    /// Install KDE Discover with its Snap and Flatpak backends.
    pub install_kde_discover: bool,
    /// Skip the package index refresh and upgrade.
    pub skip_update: bool,
    /// Services can be enabled and started.
    pub init_system_available: bool,
}

impl InstallConfig {
    /// The selected GUI store, if any.
    pub fn gui_store(&self) -> Option<GuiStore> {
        if self.install_gnome_software {
            Some(GuiStore::GnomeSoftware)
        } else if self.install_kde_discover {
            Some(GuiStore::KdeDiscover)
        } else {
            None
        }
    }
}

/// Terminal decision of the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Print this usage text and exit successfully.
    Help(String),
    /// Re-launch with root privileges, passing these arguments.
    Relaunch(Vec<String>),
    /// Proceed with installation.
    Ready(InstallConfig),
}

/// Runs the pre-installation checks against a [`Host`].
pub struct Gatekeeper<'a> {
    host: &'a dyn Host,
}

impl<'a> Gatekeeper<'a> {
    /// Create a gatekeeper probing `host`.
    pub fn new(host: &'a dyn Host) -> Self {
        Self { host }
    }

    /// Evaluate `args` (without the program name) and the environment.
    ///
    /// Advisory findings are reported through `ui`; fatal ones are returned
    /// as errors.
    pub fn run(&self, args: &[String], ui: &mut dyn UserInterface) -> Result<GateOutcome> {
        let options = match parse_options(args)? {
            ParseOutcome::Help(text) => return Ok(GateOutcome::Help(text)),
            ParseOutcome::Run(options) => options,
        };
        tracing::debug!("Options: {:?}", options);

        match ensure_privilege(self.host)? {
            PrivilegeCheck::AlreadyRoot => {}
            PrivilegeCheck::RelaunchRequired => {
                tracing::info!("Not running as root; re-launch required");
                return Ok(GateOutcome::Relaunch(args.to_vec()));
            }
        }

        self.check_virtualization()?;
        self.check_distro(ui);
        let config = self.resolve_config(&options, ui);

        tracing::info!("Environment checks passed");
        Ok(GateOutcome::Ready(config))
    }

    fn check_virtualization(&self) -> Result<()> {
        let report = detect_virtualization(self.host);
        match report.rejection_reason() {
            Some(reason) => Err(SnapflatError::unsupported(format!(
                "{}; Snap needs a full systemd host",
                reason
            ))),
            None => Ok(()),
        }
    }

    fn check_distro(&self, ui: &mut dyn UserInterface) {
        let release = read_os_release(self.host);
        let family = release
            .as_ref()
            .map(|r| r.family())
            .unwrap_or(DistroFamily::Unknown);
        tracing::debug!("Distribution family: {}", family);
        if family == DistroFamily::DebianLike {
            return;
        }

        let name = release
            .map(|release| release.display_name().to_string())
            .unwrap_or_else(|| "an unidentified distribution".to_string());
        let warning = format!("{} is not Debian-based; apt-get steps may fail", name);
        tracing::warn!("{}", warning);
        ui.warning(&warning);
    }

    fn resolve_config(&self, options: &Options, ui: &mut dyn UserInterface) -> InstallConfig {
        let selection = resolve_store_selection(options, self.host);
        if let Some(note) = selection.note() {
            ui.message(&note);
        }

        let init = detect_init_system(self.host);
        if !init.is_available() {
            let warning = "systemd is not running; snapd services will not be started";
            tracing::warn!("{}", warning);
            ui.warning(warning);
        }

        InstallConfig {
            install_gnome_software: selection.store == Some(GuiStore::GnomeSoftware),
            install_kde_discover: selection.store == Some(GuiStore::KdeDiscover),
            skip_update: options.skip_update,
            init_system_available: init.is_available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FakeHost;
    use crate::shell::CommandResult;
    use crate::ui::MockUI;

    const DEBIAN: &str = "PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\nID=debian\n";

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn healthy_root_host() -> FakeHost {
        FakeHost::new()
            .as_root(true)
            .with_file("/etc/os-release", DEBIAN)
            .with_program("systemctl")
            .respond(
                "systemctl is-system-running",
                CommandResult::with_stdout("running\n"),
            )
    }

    #[test]
    fn help_short_circuits_before_any_lookup() {
        let host = FakeHost::new();
        let mut ui = MockUI::new();
        let outcome = Gatekeeper::new(&host)
            .run(&args(&["--bogus", "--help"]), &mut ui)
            .unwrap();

        assert!(matches!(outcome, GateOutcome::Help(ref text) if text.contains("--skip-update")));
        assert!(host.lookups().is_empty());
        assert!(host.runs().is_empty());
    }

    #[test]
    fn conflicting_flags_fail_before_privilege_check() {
        let host = FakeHost::new().with_program("sudo");
        let mut ui = MockUI::new();
        let err = Gatekeeper::new(&host)
            .run(&args(&["--kde-discover", "--gnome-software"]), &mut ui)
            .unwrap_err();

        assert!(matches!(err, SnapflatError::Config { .. }));
        assert!(host.lookups().is_empty());
        assert!(host.runs().is_empty());
    }

    #[test]
    fn sudo_capable_user_gets_relaunch_with_original_args() {
        let host = FakeHost::new().with_program("sudo");
        let mut ui = MockUI::new();
        let outcome = Gatekeeper::new(&host)
            .run(&args(&["--skip-update"]), &mut ui)
            .unwrap();

        assert_eq!(outcome, GateOutcome::Relaunch(args(&["--skip-update"])));
        assert_eq!(host.command_lines(), vec!["sudo -v".to_string()]);
    }

    #[test]
    fn healthy_root_host_is_ready() {
        let host = healthy_root_host();
        let mut ui = MockUI::new();
        let outcome = Gatekeeper::new(&host).run(&[], &mut ui).unwrap();

        assert_eq!(
            outcome,
            GateOutcome::Ready(InstallConfig {
                init_system_available: true,
                ..Default::default()
            })
        );
        assert!(ui.warnings().is_empty());
        assert!(ui.has_message("No GUI store detected"));
    }

    #[test]
    fn container_aborts_before_distro_check() {
        let host = healthy_root_host().with_path("/.dockerenv");
        let mut ui = MockUI::new();
        let err = Gatekeeper::new(&host).run(&[], &mut ui).unwrap_err();

        assert!(matches!(err, SnapflatError::UnsupportedEnvironment { .. }));
        assert!(err.to_string().contains("/.dockerenv"));
        assert_eq!(host.lookup_count("read_file /etc/os-release"), 0);
        assert!(!host.ran("systemctl is-system-running"));
    }

    #[test]
    fn unknown_distro_warns_but_proceeds() {
        let host = healthy_root_host().with_file("/etc/os-release", "ID=fedora\n");
        let mut ui = MockUI::new();
        let outcome = Gatekeeper::new(&host).run(&[], &mut ui).unwrap();

        assert!(matches!(outcome, GateOutcome::Ready(_)));
        assert!(ui.has_warning("fedora is not Debian-based"));
    }

    #[test]
    fn os_release_is_read_once() {
        for release in [DEBIAN, "ID=fedora\n"] {
            let host = healthy_root_host().with_file("/etc/os-release", release);
            let mut ui = MockUI::new();
            Gatekeeper::new(&host).run(&[], &mut ui).unwrap();

            assert_eq!(host.lookup_count("read_file /etc/os-release"), 1, "{}", release);
        }
    }

    #[test]
    fn absent_init_warns_and_disables_services() {
        let host = FakeHost::new()
            .as_root(true)
            .with_file("/etc/os-release", DEBIAN);
        let mut ui = MockUI::new();
        let outcome = Gatekeeper::new(&host)
            .run(&args(&["--gnome-software"]), &mut ui)
            .unwrap();

        assert_eq!(
            outcome,
            GateOutcome::Ready(InstallConfig {
                install_gnome_software: true,
                ..Default::default()
            })
        );
        assert!(ui.has_warning("systemd is not running"));
    }

    #[test]
    fn install_config_reports_selected_store() {
        let config = InstallConfig {
            install_kde_discover: true,
            ..Default::default()
        };
        assert_eq!(config.gui_store(), Some(GuiStore::KdeDiscover));
        assert_eq!(InstallConfig::default().gui_store(), None);
    }
}
