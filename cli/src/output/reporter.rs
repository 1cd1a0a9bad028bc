//! `TerminalReporter`: Presentation-layer implementation of `InvocationReporter`.
//!
//! Wraps `&OutputContext` so the runner service can echo what it launches
//! without depending on any presentation type directly.

use crate::application::ports::InvocationReporter;
use crate::output::OutputContext;

/// Terminal reporter that wraps an `OutputContext`.
///
/// - `command()` prints `"+ argv..."`
/// - `script()` prints each script line indented by four spaces
/// - `local_dir()` prints `"+ mkdir -p <dir>"`
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl InvocationReporter for TerminalReporter<'_> {
    fn command(&self, argv: &[String]) {
        eprintln!("{}", self.ctx.format_command(argv));
    }

    fn script(&self, script: &str) {
        if !script.is_empty() {
            eprintln!("{}", self.ctx.format_script(script));
        }
    }

    fn local_dir(&self, path: &str) {
        let argv = ["mkdir".to_string(), "-p".to_string(), path.to_string()];
        eprintln!("{}", self.ctx.format_command(&argv));
    }
}
