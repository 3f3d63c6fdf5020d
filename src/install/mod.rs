//! Installation phase.
//!
//! - [`plan`] - the ordered steps derived from an [`InstallConfig`](crate::gate::InstallConfig)
//! - [`runner`] - executes the plan with spinners, one retry for the core snap
//! - [`hints`] - suggestions for recognizable failures

pub mod hints;
pub mod plan;
pub mod runner;

pub use plan::{build_plan, Action, InstallSettings, Step};
pub use runner::Installer;
