//! Application service: command runner.
//!
//! Pushes files to the target, pulls them back, and runs commands there.
//! Every process launch goes through [`Runner::launch`], which owns the
//! verbose echo and the dry-run suppression.

use std::path::Path;
use std::process::ExitStatus;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, InvocationReporter, LocalFs, Transport};
use crate::domain::error::ExecError;
use crate::domain::{RemoteEnv, TransferMap, quote};

/// Process-launch policy for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Echo every invocation and transfer script before running it.
    pub verbose: bool,
    /// Report invocations without launching anything.
    pub dry_run: bool,
}

impl RunnerOptions {
    /// Build options; `dry_run` implies `verbose`.
    #[must_use]
    pub fn new(verbose: bool, dry_run: bool) -> Self {
        Self {
            verbose: verbose || dry_run,
            dry_run,
        }
    }
}

/// Runs transfers and remote commands through a [`Transport`].
pub struct Runner<'a, T, C, F, R> {
    transport: &'a T,
    commands: &'a C,
    fs: &'a F,
    reporter: &'a R,
    options: RunnerOptions,
}

impl<'a, T, C, F, R> Runner<'a, T, C, F, R>
where
    T: Transport,
    C: CommandRunner,
    F: LocalFs,
    R: InvocationReporter,
{
    #[must_use]
    pub fn new(
        transport: &'a T,
        commands: &'a C,
        fs: &'a F,
        reporter: &'a R,
        options: RunnerOptions,
    ) -> Self {
        Self {
            transport,
            commands,
            fs,
            reporter,
            options,
        }
    }

    /// Upload every `local -> remote` entry of `map`.
    ///
    /// Creates the remote parent directories with one `mkdir -p` call, then
    /// issues one `put` per entry in a single transfer session.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::NonZeroExit`] if the `mkdir` or the transfer
    /// session fails, or an I/O error if a process cannot be launched.
    pub async fn send(&self, map: &TransferMap) -> Result<()> {
        let dirs = map.remote_parent_dirs();
        if !dirs.is_empty() {
            let mut mkdir = vec!["mkdir".to_string(), "-p".to_string()];
            mkdir.extend(dirs);
            self.run_remote(&mkdir, &RemoteEnv::default())
                .await
                .context("creating remote directories")?;
        }

        let commands: Vec<String> = map
            .iter()
            .map(|(local, remote)| format!("put {} {}", quote(local), quote(remote)))
            .collect();
        self.run_sftp(&commands).await.context("uploading files")
    }

    /// Download every `local <- remote` entry of `map`.
    ///
    /// Local parent directories are created directly on this machine first.
    ///
    /// # Errors
    ///
    /// Returns an error if a local directory cannot be created or the transfer
    /// session fails.
    pub async fn fetch(&self, map: &TransferMap) -> Result<()> {
        for dir in map.local_parent_dirs() {
            if self.options.verbose {
                self.reporter.local_dir(&dir);
            }
            if !self.options.dry_run {
                self.fs.create_dir_all(Path::new(&dir))?;
            }
        }

        let commands: Vec<String> = map
            .iter()
            .map(|(local, remote)| format!("get {} {}", quote(remote), quote(local)))
            .collect();
        self.run_sftp(&commands).await.context("downloading files")
    }

    /// Run `command` on the target with `env` injected through `env(1)`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::NonZeroExit`] carrying the remote status if the
    /// command fails.
    pub async fn run_remote(&self, command: &[String], env: &RemoteEnv) -> Result<()> {
        let mut full = Vec::with_capacity(command.len() + 1);
        full.push("env".to_string());
        full.extend(env.assignments());
        full.extend(command.iter().cloned());

        let argv = self.transport.remote_invocation(&full);
        self.launch(&argv, None).await
    }

    /// Feed `commands` as a newline-separated script to one transfer session.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::NonZeroExit`] if the session fails.
    pub async fn run_sftp(&self, commands: &[String]) -> Result<()> {
        let argv = self.transport.transfer_invocation();
        let script = commands.join("\n");
        self.launch(&argv, Some(&script)).await
    }

    /// Echo, then launch unless in dry-run. A dry run always succeeds.
    async fn launch(&self, argv: &[String], script: Option<&str>) -> Result<()> {
        if self.options.verbose {
            self.reporter.command(argv);
            if let Some(script) = script {
                self.reporter.script(script);
            }
        }
        if self.options.dry_run {
            return Ok(());
        }

        let (program, args) = argv.split_first().ok_or(ExecError::EmptyInvocation)?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::debug!(%program, args = args.len(), "launching");

        let status = match script {
            Some(script) => {
                self.commands
                    .run_with_stdin(program, &args, script.as_bytes())
                    .await?
            }
            None => self.commands.run_status(program, &args).await?,
        };
        check_status(program, status)
    }
}

fn check_status(program: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    let code = exit_code(status);
    tracing::debug!(%program, code, "process failed");
    Err(ExecError::NonZeroExit {
        program: program.to_string(),
        code,
    }
    .into())
}

/// Exit code of a finished process; a signal `N` maps to `128 + N`.
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
