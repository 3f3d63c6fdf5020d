//! Environment detection.
//!
//! Facts about the host gathered before anything is installed:
//!
//! - [`privilege`] - root check, sudo validation and re-launching
//! - [`virtualization`] - WSL and container detection
//! - [`distro`] - Debian family detection from os-release
//! - [`store`] - GUI software store selection
//! - [`init_system`] - systemd availability
//!
//! Each probe reads the machine through [`Host`](crate::host::Host) only.

pub mod distro;
pub mod init_system;
pub mod privilege;
pub mod store;
pub mod virtualization;

pub use distro::{detect_distro_family, read_os_release, DistroFamily, OsRelease};
pub use init_system::{detect_init_system, InitSystem};
pub use privilege::{
    detect_privilege, ensure_privilege, PrivilegeCheck, PrivilegeLevel, Relauncher,
    SudoRelauncher,
};
pub use store::{
    detect_installed_store, is_package_installed, resolve_store_selection, GuiStore,
    SelectionSource, StoreSelection,
};
pub use virtualization::{
    detect_virtualization, ContainerKind, DetectionSignal, RejectedVirt, VirtualizationContext,
    VirtualizationReport,
};
