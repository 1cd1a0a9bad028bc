//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::ExitStatus;

use anyhow::Result;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Both operations connect the child's stdin to a pipe and leave stdout and
/// stderr attached to the caller's own, so the child's output shows up live.
/// Neither has a timeout.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program, write `input` to its stdin, close stdin and wait.
    async fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8])
    -> Result<ExitStatus>;

    /// Run a program with an open but unused stdin pipe and wait.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Transport Port ────────────────────────────────────────────────────────────

/// Builds launchable argument vectors for a target. Performs no I/O.
pub trait Transport {
    /// Argument vector that runs `command` on the target.
    fn remote_invocation(&self, command: &[String]) -> Vec<String>;

    /// Argument vector that starts a batch file-transfer session reading its
    /// script from stdin.
    fn transfer_invocation(&self) -> Vec<String>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Local filesystem operations needed when fetching results.
pub trait LocalFs {
    /// Create `path` and all of its missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

// ── Reporting Port ────────────────────────────────────────────────────────────

/// Receives what the runner is about to do when verbose output is on.
/// Sync trait, no async needed.
pub trait InvocationReporter {
    /// An argument vector about to be launched (or skipped in dry-run).
    fn command(&self, argv: &[String]);
    /// A transfer script about to be fed to a transfer session.
    fn script(&self, script: &str);
    /// A local directory about to be created.
    fn local_dir(&self, path: &str);
}
