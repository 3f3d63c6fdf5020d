//! WSL and container detection.
//!
//! Snap needs a real init system and kernel features that WSL and container
//! runtimes do not provide, so either one stops the run before anything is
//! installed. Signals are checked in priority order and detection stops at
//! the first positive one:
//!
//! 1. WSL environment variables
//! 2. Kernel release/version strings carrying the Microsoft marker
//! 3. `systemd-detect-virt`, when installed
//! 4. Marker files and PID 1 cgroup names, only when `systemd-detect-virt`
//!    is not installed

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::host::Host;
use crate::shell::Invocation;

/// Environment variables set inside WSL sessions.
const WSL_ENV_VARS: &[&str] = &["WSL_DISTRO_NAME", "WSL_INTEROP"];

/// Kernel strings checked for the Microsoft marker.
const KERNEL_STRING_PATHS: &[&str] = &["/proc/sys/kernel/osrelease", "/proc/version"];

/// Marker files dropped by container runtimes.
const CONTAINER_MARKER_FILES: &[(&str, ContainerKind)] = &[
    ("/.dockerenv", ContainerKind::Docker),
    ("/run/.containerenv", ContainerKind::Podman),
];

/// Cgroup metadata of PID 1.
const PID1_CGROUP_PATH: &str = "/proc/1/cgroup";

/// Container runtime names looked for in the cgroup metadata, in order.
const CGROUP_MARKERS: &[(&str, ContainerKind)] = &[
    ("docker", ContainerKind::Docker),
    ("lxc", ContainerKind::Lxc),
    ("kubepods", ContainerKind::Generic),
    ("containerd", ContainerKind::Containerd),
    ("libpod", ContainerKind::Podman),
    ("podman", ContainerKind::Podman),
];

/// `systemd-detect-virt` classifications that abort the run.
const REJECTED_VIRT_TYPES: &[(&str, RejectedVirt)] = &[
    ("wsl", RejectedVirt::Wsl),
    ("docker", RejectedVirt::Container(ContainerKind::Docker)),
    ("lxc", RejectedVirt::Container(ContainerKind::Lxc)),
    ("podman", RejectedVirt::Container(ContainerKind::Podman)),
    ("container", RejectedVirt::Container(ContainerKind::Generic)),
    ("containerd", RejectedVirt::Container(ContainerKind::Containerd)),
];

static MICROSOFT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)microsoft").expect("marker pattern is valid"));

/// Container runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Docker,
    Lxc,
    Podman,
    Containerd,
    /// A container whose runtime is not identified more precisely.
    Generic,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Docker => "docker",
            Self::Lxc => "lxc",
            Self::Podman => "podman",
            Self::Containerd => "containerd",
            Self::Generic => "container",
        };
        f.write_str(name)
    }
}

/// A `systemd-detect-virt` classification that aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedVirt {
    Wsl,
    Container(ContainerKind),
}

impl RejectedVirt {
    /// Classify the single-word output of `systemd-detect-virt`.
    ///
    /// Returns `None` for everything outside the rejected set, including
    /// `none` and hypervisor names such as `kvm` or `vmware`.
    pub fn from_detect_virt(output: &str) -> Option<Self> {
        let kind = output.trim();
        REJECTED_VIRT_TYPES
            .iter()
            .find(|(name, _)| *name == kind)
            .map(|(_, rejected)| *rejected)
    }
}

/// Where the process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VirtualizationContext {
    /// Bare metal or a full virtual machine.
    BareMetalOrVm,
    /// Windows Subsystem for Linux.
    Wsl,
    /// A container.
    Container(ContainerKind),
}

impl VirtualizationContext {
    /// Whether installation may proceed.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::BareMetalOrVm)
    }
}

impl From<RejectedVirt> for VirtualizationContext {
    fn from(rejected: RejectedVirt) -> Self {
        match rejected {
            RejectedVirt::Wsl => Self::Wsl,
            RejectedVirt::Container(kind) => Self::Container(kind),
        }
    }
}

impl fmt::Display for VirtualizationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BareMetalOrVm => write!(f, "bare metal or virtual machine"),
            Self::Wsl => write!(f, "WSL"),
            Self::Container(kind) => write!(f, "{} container", kind),
        }
    }
}

/// The observation that decided the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionSignal {
    /// An environment variable was set.
    EnvVar(String),
    /// A kernel string file contained the Microsoft marker.
    KernelString(String),
    /// `systemd-detect-virt` printed this classification.
    DetectVirt(String),
    /// A container marker file exists.
    MarkerFile(String),
    /// PID 1 cgroup metadata contained this runtime name.
    Cgroup(String),
}

impl fmt::Display for DetectionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "environment variable {} is set", var),
            Self::KernelString(path) => write!(f, "{} mentions Microsoft", path),
            Self::DetectVirt(kind) => write!(f, "systemd-detect-virt reported '{}'", kind),
            Self::MarkerFile(path) => write!(f, "{} exists", path),
            Self::Cgroup(name) => write!(f, "{} mentions '{}'", PID1_CGROUP_PATH, name),
        }
    }
}

/// Result of virtualization detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualizationReport {
    /// Detected context.
    pub context: VirtualizationContext,
    /// What decided it. `None` when no probe produced anything.
    pub signal: Option<DetectionSignal>,
}

impl VirtualizationReport {
    fn new(context: VirtualizationContext, signal: DetectionSignal) -> Self {
        Self {
            context,
            signal: Some(signal),
        }
    }

    fn unsignalled() -> Self {
        Self {
            context: VirtualizationContext::BareMetalOrVm,
            signal: None,
        }
    }

    /// Why installation may not proceed, or `None` when it may.
    pub fn rejection_reason(&self) -> Option<String> {
        if self.context.is_supported() {
            return None;
        }
        Some(match &self.signal {
            Some(signal) => format!("{} detected ({})", self.context, signal),
            None => format!("{} detected", self.context),
        })
    }
}

/// Detect the virtualization context.
pub fn detect_virtualization(host: &dyn Host) -> VirtualizationReport {
    let report = detect_wsl_env(host)
        .or_else(|| detect_wsl_kernel(host))
        .unwrap_or_else(|| {
            if host.has_program("systemd-detect-virt") {
                detect_with_systemd(host)
            } else {
                detect_container_heuristics(host)
                    .unwrap_or_else(VirtualizationReport::unsignalled)
            }
        });

    tracing::debug!(
        "Virtualization context: {} ({:?})",
        report.context,
        report.signal
    );
    report
}

fn detect_wsl_env(host: &dyn Host) -> Option<VirtualizationReport> {
    WSL_ENV_VARS
        .iter()
        .find(|var| host.env_var(var).is_some())
        .map(|var| {
            VirtualizationReport::new(
                VirtualizationContext::Wsl,
                DetectionSignal::EnvVar(var.to_string()),
            )
        })
}

fn detect_wsl_kernel(host: &dyn Host) -> Option<VirtualizationReport> {
    KERNEL_STRING_PATHS
        .iter()
        .find(|path| {
            host.read_file(Path::new(path))
                .is_some_and(|content| MICROSOFT_MARKER.is_match(&content))
        })
        .map(|path| {
            VirtualizationReport::new(
                VirtualizationContext::Wsl,
                DetectionSignal::KernelString(path.to_string()),
            )
        })
}

/// Trust `systemd-detect-virt` completely once it is installed.
///
/// It prints `none` and exits non-zero on bare metal, so the exit status
/// is not consulted.
fn detect_with_systemd(host: &dyn Host) -> VirtualizationReport {
    let output = match host.run(&Invocation::new("systemd-detect-virt", Vec::<String>::new())) {
        Ok(result) => result.stdout.trim().to_string(),
        Err(e) => {
            tracing::debug!("Failed to run systemd-detect-virt: {}", e);
            return VirtualizationReport::unsignalled();
        }
    };

    let context = RejectedVirt::from_detect_virt(&output)
        .map(VirtualizationContext::from)
        .unwrap_or(VirtualizationContext::BareMetalOrVm);
    VirtualizationReport::new(context, DetectionSignal::DetectVirt(output))
}

fn detect_container_heuristics(host: &dyn Host) -> Option<VirtualizationReport> {
    if let Some((path, kind)) = CONTAINER_MARKER_FILES
        .iter()
        .find(|(path, _)| host.path_exists(Path::new(path)))
    {
        return Some(VirtualizationReport::new(
            VirtualizationContext::Container(*kind),
            DetectionSignal::MarkerFile(path.to_string()),
        ));
    }

    let cgroup = host.read_file(Path::new(PID1_CGROUP_PATH))?;
    CGROUP_MARKERS
        .iter()
        .find(|(name, _)| cgroup.contains(name))
        .map(|(name, kind)| {
            VirtualizationReport::new(
                VirtualizationContext::Container(*kind),
                DetectionSignal::Cgroup(name.to_string()),
            )
        })
}
