//! Command-line interface for snapflat.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`driver`] - Runs the gate and hands off to re-launch or installation

pub mod args;
pub mod driver;

pub use args::{parse_options, usage, Cli, Options, ParseOutcome};
pub use driver::{run, run_with_settings};
