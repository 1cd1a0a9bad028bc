//! remote-exec - run a command on a remote host as if it ran locally

use std::process::ExitCode;

use clap::Parser;

use remote_exec::app::{self, exit_code_from_status, propagated_exit_code};
use remote_exec::cli::Cli;
use remote_exec::output::OutputContext;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    app::init_tracing();
    let no_color = cli.no_color;

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(code) = propagated_exit_code(&e) {
                tracing::debug!(error = %format!("{e:#}"), "propagating child exit status");
                return exit_code_from_status(code);
            }
            OutputContext::new(no_color).error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
