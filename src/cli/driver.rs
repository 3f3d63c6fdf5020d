//! Top-level run: gate, re-launch hand-off, installation.

use crate::environment::Relauncher;
use crate::error::Result;
use crate::gate::{GateOutcome, Gatekeeper};
use crate::host::Host;
use crate::install::{InstallSettings, Installer};
use crate::ui::UserInterface;

/// Run snapflat with `args` (without the program name).
///
/// Returns `Ok` for help, for a successful hand-off to a re-launched
/// instance and for a completed installation.
pub fn run(
    args: &[String],
    host: &dyn Host,
    relauncher: &dyn Relauncher,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    run_with_settings(args, host, relauncher, ui, InstallSettings::default())
}

/// [`run`] with custom installation settings.
pub fn run_with_settings(
    args: &[String],
    host: &dyn Host,
    relauncher: &dyn Relauncher,
    ui: &mut dyn UserInterface,
    settings: InstallSettings,
) -> Result<()> {
    match Gatekeeper::new(host).run(args, ui)? {
        GateOutcome::Help(text) => {
            ui.message(text.trim_end());
            Ok(())
        }
        GateOutcome::Relaunch(args) => {
            ui.message("Root privileges are required; re-launching with sudo");
            relauncher.relaunch(&args)
        }
        GateOutcome::Ready(config) => {
            tracing::debug!("Install config: {:?}", config);
            Installer::with_settings(host, settings).run(&config, ui)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnapflatError;
    use crate::host::FakeHost;
    use crate::ui::MockUI;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingRelauncher {
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl Relauncher for RecordingRelauncher {
        fn relaunch(&self, args: &[String]) -> Result<()> {
            self.calls.borrow_mut().push(args.to_vec());
            Ok(())
        }
    }

    #[test]
    fn help_prints_usage() {
        let host = FakeHost::new();
        let relauncher = RecordingRelauncher::default();
        let mut ui = MockUI::new();
        run(&["-h".to_string()], &host, &relauncher, &mut ui).unwrap();

        assert!(ui.has_message("--gnome-software"));
        assert!(relauncher.calls.borrow().is_empty());
    }

    #[test]
    fn relaunch_is_handed_original_args() {
        let host = FakeHost::new().with_program("sudo");
        let relauncher = RecordingRelauncher::default();
        let mut ui = MockUI::new();
        let args = vec!["--kde-discover".to_string()];
        run(&args, &host, &relauncher, &mut ui).unwrap();

        assert_eq!(*relauncher.calls.borrow(), vec![args]);
        assert!(!host.ran_program("apt-get"));
    }

    #[test]
    fn gate_errors_propagate() {
        let host = FakeHost::new();
        let relauncher = RecordingRelauncher::default();
        let mut ui = MockUI::new();
        let err = run(&["extra".to_string()], &host, &relauncher, &mut ui).unwrap_err();

        assert!(matches!(err, SnapflatError::Config { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
