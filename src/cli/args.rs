//! CLI argument definitions.
//!
//! The flags are declared with clap's derive macros on [`Cli`]. Callers go
//! through [`parse_options`], which turns clap's errors into
//! [`SnapflatError::Config`] values instead of exiting the process.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::error::{Result, SnapflatError};
use crate::environment::store::GuiStore;

/// Install Snap and Flatpak/Flathub on Debian-family systems.
#[derive(Debug, Parser)]
#[command(name = "snapflat")]
#[command(about, long_about = None)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Also install GNOME Software with Snap and Flatpak plugins
    #[arg(long, conflicts_with = "kde_discover")]
    pub gnome_software: bool,

    /// Also install KDE Discover with Snap and Flatpak backends
    #[arg(long)]
    pub kde_discover: bool,

    /// Skip the initial package index refresh and upgrade
    #[arg(long)]
    pub skip_update: bool,
}

/// Options requested on the command line.
///
/// Never selects both GUI stores; [`parse_options`] rejects that combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// `--gnome-software` was passed.
    pub gnome_software: bool,
    /// `--kde-discover` was passed.
    pub kde_discover: bool,
    /// `--skip-update` was passed.
    pub skip_update: bool,
}

impl Options {
    /// The GUI store selected by flag, if any.
    pub fn requested_store(&self) -> Option<GuiStore> {
        if self.gnome_software {
            Some(GuiStore::GnomeSoftware)
        } else if self.kde_discover {
            Some(GuiStore::KdeDiscover)
        } else {
            None
        }
    }
}

impl From<Cli> for Options {
    fn from(cli: Cli) -> Self {
        Self {
            gnome_software: cli.gnome_software,
            kde_discover: cli.kde_discover,
            skip_update: cli.skip_update,
        }
    }
}

/// What the argument list asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// `-h`/`--help` was given; carries the rendered usage text.
    Help(String),
    /// Proceed with these options.
    Run(Options),
}

/// Parse the argument list (without the program name).
///
/// A help flag anywhere wins over every other argument, valid or not.
/// Options take no values and there are no positionals, so a bare `--`
/// is rejected like any other stray argument.
pub fn parse_options(args: &[String]) -> Result<ParseOutcome> {
    if args.iter().any(|a| a == "-h" || a == "--help") {
        return Ok(ParseOutcome::Help(usage()));
    }

    // clap swallows a bare `--` as the end-of-options marker
    if args.iter().any(|a| a == "--") {
        return Err(SnapflatError::config("unexpected argument '--'"));
    }

    let argv = std::iter::once("snapflat".to_string()).chain(args.iter().cloned());
    let cli = Cli::try_parse_from(argv).map_err(config_error)?;

    Ok(ParseOutcome::Run(cli.into()))
}

/// Rendered usage text.
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

fn config_error(err: clap::Error) -> SnapflatError {
    if err.kind() == ErrorKind::ArgumentConflict {
        return SnapflatError::config(
            "--gnome-software and --kde-discover cannot be used together",
        );
    }

    // First line of clap's rendering, without the "error: " prefix
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    SnapflatError::config(first.trim_start_matches("error: ").trim())
}
