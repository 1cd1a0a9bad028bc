//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Configuration errors ──────────────────────────────────────────────────────

/// Errors detected while building the run configuration, before any process
/// is launched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "'{path}' is classified for transfer more than once (already mapped to '{existing}', \
         now to '{requested}'). Check that --input-prefix and --output-prefix do not overlap."
    )]
    DuplicateTransfer {
        path: String,
        existing: String,
        requested: String,
    },

    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("No target host given. Pass <HOST> before the command or use --local-sftp-server.")]
    MissingHost,

    #[error("No command given to run on the target.")]
    MissingCommand,
}

// ── Execution errors ──────────────────────────────────────────────────────────

/// Errors raised by launched processes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecError {
    /// A launched process exited unsuccessfully. `code` is the status the tool
    /// itself exits with.
    #[error("{program} exited with status {code}")]
    NonZeroExit { program: String, code: i32 },

    #[error("refusing to launch an empty command line")]
    EmptyInvocation,
}

impl ExecError {
    /// Exit code to propagate for this failure, if it carries one.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => Some(*code),
            Self::EmptyInvocation => None,
        }
    }
}
