//! Application service: remote execution use-case.
//!
//! Classify → upload → execute → download. Strictly linear: the first failure
//! ends the run, and nothing after it is attempted.
//!
//! Imports only from `crate::domain` and `crate::application`.

use anyhow::Result;

use crate::application::ports::{CommandRunner, InvocationReporter, LocalFs, Transport};
use crate::application::services::runner::Runner;
use crate::domain::error::ConfigError;
use crate::domain::{RemoteEnv, TransferMap, find_transfers, join_remote, rewrite_command};

/// Default remote subdirectory for staged inputs.
pub const DEFAULT_REMOTE_INPUT_PREFIX: &str = "input";
/// Default remote subdirectory for staged outputs.
pub const DEFAULT_REMOTE_OUTPUT_PREFIX: &str = "output";

/// Where local paths are recognised and where they land on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixConfig {
    /// Writable working directory on the target.
    pub remote_dir: String,
    /// Local prefix of files to upload before the run.
    pub input_prefix: Option<String>,
    /// Local prefix of files to upload before and download after the run.
    pub output_prefix: Option<String>,
    /// Subdirectory of `remote_dir` receiving inputs.
    pub remote_input_prefix: String,
    /// Subdirectory of `remote_dir` receiving outputs.
    pub remote_output_prefix: String,
}

impl PrefixConfig {
    /// Config with the default `input`/`output` subdirectories and no prefixes.
    #[must_use]
    pub fn new(remote_dir: impl Into<String>) -> Self {
        Self {
            remote_dir: remote_dir.into(),
            input_prefix: None,
            output_prefix: None,
            remote_input_prefix: DEFAULT_REMOTE_INPUT_PREFIX.to_string(),
            remote_output_prefix: DEFAULT_REMOTE_OUTPUT_PREFIX.to_string(),
        }
    }

    #[must_use]
    pub fn remote_input_dir(&self) -> String {
        join_remote(&self.remote_dir, &self.remote_input_prefix)
    }

    #[must_use]
    pub fn remote_output_dir(&self) -> String {
        join_remote(&self.remote_dir, &self.remote_output_prefix)
    }
}

/// Files to move in each direction for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferPlan {
    /// Sent before execution: inputs plus outputs.
    pub upload: TransferMap,
    /// Fetched after execution: outputs only.
    pub download: TransferMap,
}

impl TransferPlan {
    /// Command line with every staged path replaced by its remote path.
    #[must_use]
    pub fn rewrite<S: AsRef<str>>(&self, command: &[S]) -> Vec<String> {
        rewrite_command(command, &[&self.upload, &self.download])
    }
}

/// Classify `command` against the configured prefixes.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateTransfer`] if a token matches both the
/// input and the output prefix.
pub fn plan_transfers<S: AsRef<str>>(
    command: &[S],
    prefixes: &PrefixConfig,
) -> Result<TransferPlan, ConfigError> {
    let mut upload = match &prefixes.input_prefix {
        Some(prefix) => find_transfers(command, prefix, &prefixes.remote_input_dir()),
        None => TransferMap::new(),
    };
    let download = match &prefixes.output_prefix {
        Some(prefix) => find_transfers(command, prefix, &prefixes.remote_output_dir()),
        None => TransferMap::new(),
    };
    upload.merge(&download)?;

    tracing::debug!(
        upload = upload.len(),
        download = download.len(),
        "classified command line"
    );
    tracing::trace!(?upload, ?download, "transfer plan");
    Ok(TransferPlan { upload, download })
}

/// Plan transfers for `command`, then upload, run it remotely and download.
///
/// The transfer plan is built before anything is launched, so a
/// configuration error never leaves work half done. Outputs are not fetched
/// when the remote command fails.
///
/// # Errors
///
/// Returns a [`ConfigError`] for overlapping classifications, or the first
/// failure of the upload, the remote command, or the download.
pub async fn execute_remote<T, C, F, R>(
    runner: &Runner<'_, T, C, F, R>,
    command: &[String],
    prefixes: &PrefixConfig,
    env: &RemoteEnv,
) -> Result<TransferPlan>
where
    T: Transport,
    C: CommandRunner,
    F: LocalFs,
    R: InvocationReporter,
{
    let plan = plan_transfers(command, prefixes)?;

    if !plan.upload.is_empty() {
        tracing::debug!(files = plan.upload.len(), "uploading");
        runner.send(&plan.upload).await?;
    }

    let remote_command = plan.rewrite(command);
    tracing::debug!("executing remote command");
    runner.run_remote(&remote_command, env).await?;

    if !plan.download.is_empty() {
        tracing::debug!(files = plan.download.len(), "downloading");
        runner.fetch(&plan.download).await?;
    }

    Ok(plan)
}
