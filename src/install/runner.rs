//! Plan execution.

use crate::error::{Result, SnapflatError};
use crate::gate::InstallConfig;
use crate::host::Host;
use crate::shell::{CommandResult, Invocation};
use crate::ui::{SpinnerHandle, UserInterface};

use super::hints::find_hint;
use super::plan::{build_plan, Action, InstallSettings, Step};

/// Runs the installation plan against a [`Host`].
pub struct Installer<'a> {
    host: &'a dyn Host,
    settings: InstallSettings,
}

impl<'a> Installer<'a> {
    /// Create an installer with custom settings.
    pub fn with_settings(host: &'a dyn Host, settings: InstallSettings) -> Self {
        Self { host, settings }
    }

    /// Install everything `config` asks for.
    ///
    /// Steps run strictly in order; the first failure stops the run.
    pub fn run(&self, config: &InstallConfig, ui: &mut dyn UserInterface) -> Result<()> {
        let plan = build_plan(config, &self.settings);
        tracing::info!("Running installation plan with {} steps", plan.len());

        ui.show_header("Installing Snap and Flatpak");
        for step in &plan {
            self.run_step(step, ui)?;
        }

        ui.success("Snap and Flatpak are ready");
        ui.show_hint(
            "Reboot or log out and back in so Flatpak apps and /snap/bin show up in your PATH",
        );
        Ok(())
    }

    fn run_step(&self, step: &Step, ui: &mut dyn UserInterface) -> Result<()> {
        tracing::info!("Step: {}", step.title);
        let mut spinner = ui.start_spinner(&format!("{}...", step.title));
        let mut warnings = Vec::new();

        for action in &step.actions {
            if let Err(e) = self.run_action(action, spinner.as_mut(), &mut warnings) {
                spinner.finish_error(&format!("{} failed", step.title));
                if let SnapflatError::CommandFailed {
                    command, stderr, ..
                } = &e
                {
                    let hint = step
                        .invocations()
                        .find(|inv| inv.command_line() == *command)
                        .and_then(|inv| find_hint(inv, stderr));
                    ui.show_error_block(command, stderr, hint);
                }
                return Err(e);
            }
        }

        spinner.finish_success(&step.done);
        for warning in &warnings {
            ui.warning(warning);
        }
        Ok(())
    }

    fn run_action(
        &self,
        action: &Action,
        spinner: &mut dyn SpinnerHandle,
        warnings: &mut Vec<String>,
    ) -> Result<()> {
        match action {
            Action::Run(invocation) => {
                spinner.set_message(&format!("Running `{}`", invocation));
                let result = self.host.run(invocation)?;
                check(invocation, result)
            }
            Action::RunTolerant(invocation) => {
                spinner.set_message(&format!("Running `{}`", invocation));
                let failure = match self.host.run(invocation) {
                    Ok(result) if result.success => return Ok(()),
                    Ok(result) => result.stderr.trim().to_string(),
                    Err(e) => e.to_string(),
                };
                tracing::warn!("Ignoring failure of `{}`: {}", invocation, failure);
                warnings.push(format!("`{}` failed; continuing", invocation));
                Ok(())
            }
            Action::RunWithRetry { invocation, delay } => {
                spinner.set_message(&format!("Running `{}`", invocation));
                // Either kind of first-attempt failure gets the retry
                let failure = match self.host.run(invocation) {
                    Ok(result) if result.success => return Ok(()),
                    Ok(result) => format!("exit code {:?}", result.exit_code),
                    Err(e) => e.to_string(),
                };

                tracing::warn!(
                    "`{}` failed ({}); retrying in {:?}",
                    invocation,
                    failure,
                    delay
                );
                spinner.set_message(&format!("Retrying `{}` (attempt 2/2)", invocation));
                self.host.sleep(*delay);
                let second = self.host.run(invocation)?;
                check(invocation, second)
            }
            Action::EnsureSymlink { target, link } => {
                if self.host.path_exists(link) {
                    tracing::debug!("{} already exists", link.display());
                    return Ok(());
                }
                spinner.set_message(&format!(
                    "Linking {} -> {}",
                    link.display(),
                    target.display()
                ));
                self.host.symlink(target, link)
            }
            Action::Warn(message) => {
                tracing::warn!("{}", message);
                warnings.push(message.clone());
                Ok(())
            }
        }
    }
}

fn check(invocation: &Invocation, result: CommandResult) -> Result<()> {
    if result.success {
        return Ok(());
    }
    Err(SnapflatError::CommandFailed {
        command: invocation.command_line(),
        code: result.exit_code,
        stderr: result.stderr.trim().to_string(),
    })
}
