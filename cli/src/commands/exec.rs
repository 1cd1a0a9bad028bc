//! `remote-exec`: stage files, run a command on the target, fetch results.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::remote_exec::{
    DEFAULT_REMOTE_INPUT_PREFIX, DEFAULT_REMOTE_OUTPUT_PREFIX, PrefixConfig, execute_remote,
};
use crate::application::services::runner::Runner;
use crate::domain::{ConfigError, REMOTE_ENV_PREFIX, RemoteEnv, Target};
use crate::infra::{LocalTransport, SshTransport, TransportKind};
use crate::output::TerminalReporter;

/// Arguments for the exec command.
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Writable working directory on the target
    #[arg(long, value_name = "DIR", env = "REMOTE_EXEC_DIR")]
    pub remote_dir: String,

    /// Local path prefix of files to upload before the run
    #[arg(long, value_name = "PREFIX")]
    pub input_prefix: Option<String>,

    /// Local path prefix of files to upload before and download after the run
    #[arg(long, value_name = "PREFIX")]
    pub output_prefix: Option<String>,

    /// Subdirectory of --remote-dir receiving inputs
    #[arg(long, value_name = "DIR", default_value = DEFAULT_REMOTE_INPUT_PREFIX)]
    pub remote_input_prefix: String,

    /// Subdirectory of --remote-dir receiving outputs
    #[arg(long, value_name = "DIR", default_value = DEFAULT_REMOTE_OUTPUT_PREFIX)]
    pub remote_output_prefix: String,

    /// Identity file passed to ssh and sftp
    #[arg(short = 'i', long, value_name = "FILE", env = "REMOTE_EXEC_IDENTITY")]
    pub identity: Option<PathBuf>,

    /// Extra ssh/sftp option, e.g. -o BatchMode=yes (repeatable)
    #[arg(short = 'o', long = "option", value_name = "OPT")]
    pub options: Vec<String>,

    /// Print every command before running it
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the commands without running them (implies --verbose)
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Run locally, transferring through this sftp-server binary. No HOST is
    /// taken from the command line.
    #[arg(long, value_name = "PATH")]
    pub local_sftp_server: Option<PathBuf>,

    /// [HOST] COMMAND [ARGS]...
    #[arg(required = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl ExecArgs {
    /// Select the transport and split the target off the positional tokens.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the host or the command is missing, or the
    /// target descriptor is malformed.
    pub fn transport(&self) -> Result<(TransportKind, &[String]), ConfigError> {
        let (transport, command) = match &self.local_sftp_server {
            Some(server) => (
                TransportKind::Local(LocalTransport::new(server.clone())),
                self.args.as_slice(),
            ),
            None => {
                let (host, command) = self.args.split_first().ok_or(ConfigError::MissingHost)?;
                let ssh = SshTransport::new(
                    Target::parse(host)?,
                    self.identity.clone(),
                    self.options.clone(),
                );
                (TransportKind::Ssh(ssh), command)
            }
        };
        if command.is_empty() {
            return Err(ConfigError::MissingCommand);
        }
        Ok((transport, command))
    }

    /// Prefix configuration for classifying the command line.
    #[must_use]
    pub fn prefixes(&self) -> PrefixConfig {
        PrefixConfig {
            remote_dir: self.remote_dir.clone(),
            input_prefix: non_empty(self.input_prefix.as_deref()),
            output_prefix: non_empty(self.output_prefix.as_deref()),
            remote_input_prefix: self.remote_input_prefix.clone(),
            remote_output_prefix: self.remote_output_prefix.clone(),
        }
    }
}

/// An empty prefix would match every token, so it counts as unset.
fn non_empty(prefix: Option<&str>) -> Option<String> {
    prefix.filter(|p| !p.is_empty()).map(str::to_string)
}

/// Run the command on the target, staging files around it.
///
/// # Errors
///
/// Returns an error for invalid configuration, or the first failure among
/// upload, remote execution and download.
pub async fn run(ctx: &AppContext, args: &ExecArgs) -> Result<()> {
    let (transport, command) = args.transport()?;
    let prefixes = args.prefixes();
    let env = RemoteEnv::collect(
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?))),
        REMOTE_ENV_PREFIX,
    );

    let reporter = TerminalReporter::new(&ctx.output);
    let runner = Runner::new(&transport, &ctx.commands, &ctx.fs, &reporter, ctx.options);

    execute_remote(&runner, command, &prefixes, &env).await?;
    Ok(())
}
