//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution,
//! filesystem access, and the transport command builders.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod fs;
pub mod transport;

pub use command_runner::TokioCommandRunner;
pub use fs::OsFs;
pub use transport::{LocalTransport, SshTransport, TransportKind};
