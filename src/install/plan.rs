//! Installation plan.
//!
//! [`build_plan`] turns an [`InstallConfig`] into the ordered list of
//! [`Step`]s the [`Installer`](super::Installer) executes. Building the plan
//! has no side effects, so every decision about what will run is testable
//! without a host.

use std::path::PathBuf;
use std::time::Duration;

use crate::gate::InstallConfig;
use crate::shell::Invocation;

/// Tunables for the installation phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSettings {
    /// Packages installed before Snap and Flatpak.
    pub base_packages: Vec<String>,
    /// Name of the Flatpak remote to add.
    pub flathub_name: String,
    /// URL of the Flatpak remote definition.
    pub flathub_url: String,
    /// Where snapd mounts snaps.
    pub snap_mount_dir: PathBuf,
    /// Classic-confinement path linked to [`snap_mount_dir`](Self::snap_mount_dir).
    pub snap_link: PathBuf,
    /// Wait before retrying `snap install core`.
    pub core_retry_delay: Duration,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            base_packages: ["ca-certificates", "curl", "gnupg"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            flathub_name: "flathub".to_string(),
            flathub_url: "https://dl.flathub.org/repo/flathub.flatpakrepo".to_string(),
            snap_mount_dir: PathBuf::from("/var/lib/snapd/snap"),
            snap_link: PathBuf::from("/snap"),
            core_retry_delay: Duration::from_secs(10),
        }
    }
}

/// A single thing to do within a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run a command; failure aborts the installation.
    Run(Invocation),
    /// Run a command; failure only produces a warning.
    RunTolerant(Invocation),
    /// Run a command, retrying once after `delay` if it fails.
    RunWithRetry { invocation: Invocation, delay: Duration },
    /// Create `link -> target` unless `link` already exists.
    EnsureSymlink { target: PathBuf, link: PathBuf },
    /// Report a warning without doing anything.
    Warn(String),
}

/// A named group of actions shown as one spinner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Spinner text while the step runs.
    pub title: String,
    /// Message once the step succeeded.
    pub done: String,
    /// Actions, in order.
    pub actions: Vec<Action>,
}

impl Step {
    fn new(title: &str, done: &str) -> Self {
        Self {
            title: title.to_string(),
            done: done.to_string(),
            actions: Vec::new(),
        }
    }

    fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Invocations this step may run, in order.
    pub fn invocations(&self) -> impl Iterator<Item = &Invocation> {
        self.actions.iter().filter_map(|action| match action {
            Action::Run(inv)
            | Action::RunTolerant(inv)
            | Action::RunWithRetry {
                invocation: inv, ..
            } => Some(inv),
            Action::EnsureSymlink { .. } | Action::Warn(_) => None,
        })
    }
}

/// Keep existing config files when a package ships a new version of one,
/// instead of stopping at dpkg's conffile prompt.
pub const DPKG_CONFFILE_ARGS: &[&str] = &[
    "-o",
    "Dpkg::Options::=--force-confdef",
    "-o",
    "Dpkg::Options::=--force-confold",
];

/// `apt-get` with dpkg prompts disabled.
fn apt_get<I, S>(args: I) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Invocation::new("apt-get", args).with_env("DEBIAN_FRONTEND", "noninteractive")
}

fn apt_install<I, S>(packages: I) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = vec!["install".to_string(), "-y".to_string()];
    args.extend(DPKG_CONFFILE_ARGS.iter().map(|a| a.to_string()));
    args.extend(packages.into_iter().map(Into::into));
    apt_get(args)
}

fn apt_upgrade() -> Invocation {
    apt_get(["upgrade", "-y"].iter().chain(DPKG_CONFFILE_ARGS).copied())
}

fn systemctl_enable(unit: &str) -> Invocation {
    Invocation::new("systemctl", ["enable", "--now", unit])
}

/// Build the ordered installation plan.
pub fn build_plan(config: &InstallConfig, settings: &InstallSettings) -> Vec<Step> {
    let mut plan = Vec::new();

    if !config.skip_update {
        plan.push(
            Step::new("Refreshing package lists", "Package lists refreshed")
                .then(Action::Run(apt_get(["update"])))
                .then(Action::Run(apt_upgrade())),
        );
    }

    plan.push(
        Step::new("Installing base dependencies", "Base dependencies installed")
            .then(Action::Run(apt_install(settings.base_packages.iter().cloned()))),
    );

    plan.push(snap_step(config, settings));
    plan.push(flatpak_step(settings));

    if let Some(store) = config.gui_store() {
        plan.push(
            Step::new(
                &format!("Installing {}", store),
                &format!("{} installed", store),
            )
            .then(Action::Run(apt_install(store.packages().iter().copied()))),
        );
    }

    plan
}

fn snap_step(config: &InstallConfig, settings: &InstallSettings) -> Step {
    let mut step =
        Step::new("Installing Snap", "Snap installed").then(Action::Run(apt_install(["snapd"])));

    if config.init_system_available {
        step = step
            .then(Action::Run(systemctl_enable("snapd.socket")))
            // Only present on AppArmor systems
            .then(Action::RunTolerant(systemctl_enable(
                "snapd.apparmor.service",
            )));
    } else {
        step = step.then(Action::Warn(
            "systemd is not running; enable snapd.socket manually once it is".to_string(),
        ));
    }

    step = step.then(Action::EnsureSymlink {
        target: settings.snap_mount_dir.clone(),
        link: settings.snap_link.clone(),
    });

    if config.init_system_available {
        step.then(Action::RunWithRetry {
            invocation: Invocation::new("snap", ["install", "core"]),
            delay: settings.core_retry_delay,
        })
    } else {
        step.then(Action::Warn(
            "Skipped the core snap; snapd cannot run without systemd".to_string(),
        ))
    }
}

fn flatpak_step(settings: &InstallSettings) -> Step {
    Step::new("Installing Flatpak", "Flatpak installed with Flathub")
        .then(Action::Run(apt_install(["flatpak"])))
        .then(Action::Run(Invocation::new(
            "flatpak",
            [
                "remote-add",
                "--if-not-exists",
                settings.flathub_name.as_str(),
                settings.flathub_url.as_str(),
            ],
        )))
        .then(Action::Run(Invocation::new(
            "flatpak",
            ["update", "--appstream", "-y"],
        )))
}
