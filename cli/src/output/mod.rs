//! Output formatting module
//!
//! Everything here goes to stderr: stdout belongs to the remote command.

pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying the stylesheet for stderr.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool) -> Self {
        let is_tty = Term::stderr().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self { styles }
    }

    /// Print an error message prefixed with `error:` to stderr.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.format_error(msg));
    }

    /// Render `msg` as `error: msg`.
    #[must_use]
    pub fn format_error(&self, msg: &str) -> String {
        format!("{} {msg}", "error:".style(self.styles.error))
    }

    /// Render an echoed command line as `+ arg arg ...`.
    #[must_use]
    pub fn format_command(&self, argv: &[String]) -> String {
        format!(
            "{} {}",
            "+".style(self.styles.marker),
            argv.join(" ").style(self.styles.command)
        )
    }

    /// Render each line of a transfer script indented under its command.
    #[must_use]
    pub fn format_script(&self, script: &str) -> String {
        script
            .lines()
            .map(|line| format!("    {}", line.style(self.styles.script)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
