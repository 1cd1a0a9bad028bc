//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. There is no timeout: a hung transport client
//! blocks the run until it is killed externally.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use crate::application::ports::CommandRunner;

/// Production `CommandRunner`: stdin is piped, stdout and stderr are
/// inherited so the child's output reaches the caller's terminal live.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn spawn(program: &str, args: &[&str]) -> Result<tokio::process::Child> {
        tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
    ) -> Result<ExitStatus> {
        let mut child = Self::spawn(program, args)?;

        if let Some(mut stdin) = child.stdin.take() {
            // A client that exits early closes its end; its status reports why.
            if let Err(e) = stdin.write_all(input).await {
                tracing::debug!(%program, error = %e, "stdin closed before script was written");
            }
            drop(stdin);
        }

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        let mut child = Self::spawn(program, args)?;
        // Held open for the child's lifetime; nothing is ever written.
        let stdin = child.stdin.take();

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"));
        drop(stdin);
        status
    }
}
