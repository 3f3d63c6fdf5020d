//! Terminal UI.

use console::Term;
use std::io::Write;

use super::spinner::LineSpinner;
use super::{ProgressSpinner, SnapflatTheme, SpinnerHandle, UserInterface};

/// Terminal UI implementation.
///
/// Regular output goes to stdout; warnings and errors go to stderr. When
/// stdout is not a terminal, spinners degrade to plain status lines.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: SnapflatTheme,
    interactive: bool,
}

impl TerminalUI {
    /// Create a terminal UI, detecting colour support and TTY.
    pub fn new() -> Self {
        let out = Term::stdout();
        let interactive = out.is_term();
        Self {
            out,
            err: Term::stderr(),
            theme: SnapflatTheme::detect(),
            interactive,
        }
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.out, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.interactive {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(LineSpinner::new(message, self.theme.clone()))
        }
    }

    fn show_header(&mut self, title: &str) {
        writeln!(self.out, "\n{}\n", self.theme.format_header(title)).ok();
    }

    fn show_hint(&mut self, hint: &str) {
        writeln!(self.out, "  {}", self.theme.hint.apply_to(hint)).ok();
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        let b = &self.theme.border;
        writeln!(
            self.err,
            "    {} {}",
            b.apply_to("┌─"),
            b.apply_to("Command ──────────────────────────")
        )
        .ok();
        writeln!(
            self.err,
            "    {} {}",
            b.apply_to("│"),
            self.theme.command.apply_to(command)
        )
        .ok();

        if !output.is_empty() {
            writeln!(
                self.err,
                "    {} {}",
                b.apply_to("├─"),
                b.apply_to("Output ───────────────────────────")
            )
            .ok();
            for line in output.lines() {
                writeln!(self.err, "    {} {}", b.apply_to("│"), line).ok();
            }
        }

        writeln!(
            self.err,
            "    {}",
            b.apply_to("└────────────────────────────────────")
        )
        .ok();

        if let Some(h) = hint {
            writeln!(self.err).ok();
            writeln!(
                self.err,
                "    {} {}",
                self.theme.hint.apply_to("Hint:"),
                self.theme.hint.apply_to(h)
            )
            .ok();
        }
    }
}

/// Create the UI for a real run.
pub fn create_ui() -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new())
}
