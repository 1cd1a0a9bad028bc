//! Application context: state shared by the command handler, plus process
//! level setup (logging) and exit-code mapping.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::application::services::runner::RunnerOptions;
use crate::domain::ExecError;
use crate::infra::{OsFs, TokioCommandRunner};
use crate::output::OutputContext;

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "REMOTE_EXEC_LOG";

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Echo invocations before running them.
    pub verbose: bool,
    /// Echo invocations without running them.
    pub dry_run: bool,
}

/// Unified application context, constructed once per run.
pub struct AppContext {
    /// Terminal output context (colors).
    pub output: OutputContext,
    /// Process-launch policy.
    pub options: RunnerOptions,
    /// Process launcher.
    pub commands: TokioCommandRunner,
    /// Local filesystem.
    pub fs: OsFs,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        Self {
            output: OutputContext::new(flags.no_color),
            options: RunnerOptions::new(flags.verbose, flags.dry_run),
            commands: TokioCommandRunner::new(),
            fs: OsFs,
        }
    }
}

/// Install the stderr `tracing` subscriber, filtered by `REMOTE_EXEC_LOG`
/// (default `warn`). A second call is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(console::Term::stderr().is_term())
        .with_target(false)
        .try_init();
}

/// Exit code carried by a failed child process anywhere in `err`'s chain.
#[must_use]
pub fn propagated_exit_code(err: &anyhow::Error) -> Option<i32> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ExecError>())
        .and_then(ExecError::exit_code)
}

/// Map a child status onto this process's exit status byte.
///
/// Only the low 8 bits survive; a failure that would wrap to 0 becomes 1.
#[must_use]
pub fn exit_status_byte(code: i32) -> u8 {
    let byte = u8::try_from(code & 0xff).unwrap_or(1);
    if byte == 0 && code != 0 { 1 } else { byte }
}

/// [`ExitCode`] for a child status, see [`exit_status_byte`].
#[must_use]
pub fn exit_code_from_status(code: i32) -> ExitCode {
    ExitCode::from(exit_status_byte(code))
}
