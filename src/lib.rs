//! snapflat - install Snap and Flatpak/Flathub on Debian-family systems.
//!
//! Before touching the machine, snapflat checks that it runs as root
//! (re-launching itself under sudo when possible), refuses WSL and
//! containers, and works out which GUI store to add Snap and Flatpak
//! support to. It then installs snapd and Flatpak with the Flathub remote.
//!
//! # Modules
//!
//! - [`cli`] - Argument parsing and the top-level run
//! - [`environment`] - Privilege, virtualization, distribution, store and init detection
//! - [`error`] - Error types and result aliases
//! - [`gate`] - Ordered pre-installation checks
//! - [`host`] - Every side effect behind one trait, with a fake for tests
//! - [`install`] - Installation plan and its execution
//! - [`shell`] - Program execution and PATH lookup
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use snapflat::gate::{GateOutcome, Gatekeeper};
//! use snapflat::host::FakeHost;
//! use snapflat::ui::MockUI;
//!
//! let host = FakeHost::new().as_root(true);
//! let mut ui = MockUI::new();
//! let outcome = Gatekeeper::new(&host)
//!     .run(&["--skip-update".to_string()], &mut ui)
//!     .unwrap();
//!
//! match outcome {
//!     GateOutcome::Ready(config) => assert!(config.skip_update),
//!     other => panic!("unexpected outcome: {:?}", other),
//! }
//! ```

pub mod cli;
pub mod environment;
pub mod error;
pub mod gate;
pub mod host;
pub mod install;
pub mod shell;
pub mod ui;

pub use error::{Result, SnapflatError};
