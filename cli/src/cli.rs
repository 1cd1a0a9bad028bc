//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::Parser;

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Run a command on a remote host, staging input files there and fetching
/// output files back afterwards.
///
/// Arguments starting with --input-prefix are uploaded before the run.
/// Arguments starting with --output-prefix are uploaded before and downloaded
/// after it. Both are rewritten to their remote paths. Local variables named
/// REMOTE_ENV_<NAME> are passed to the remote command as <NAME>.
#[derive(Parser)]
#[command(
    name = "remote-exec",
    version,
    trailing_var_arg = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Disable colored output (also disabled when NO_COLOR is set)
    #[arg(long)]
    pub no_color: bool,

    #[command(flatten)]
    pub exec: commands::exec::ExecArgs,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any launched
    /// process fails.
    pub async fn run(self) -> Result<()> {
        let Cli { no_color, exec } = self;
        let ctx = AppContext::new(&AppFlags {
            no_color,
            verbose: exec.verbose,
            dry_run: exec.dry_run,
        });
        commands::exec::run(&ctx, &exec).await
    }
}
