//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod env;
pub mod error;
pub mod quote;
pub mod target;
pub mod transfer;

pub use env::{REMOTE_ENV_PREFIX, RemoteEnv};
pub use error::{ConfigError, ExecError};
pub use quote::quote;
pub use target::Target;
pub use transfer::{TransferMap, find_transfers, join_remote, parent_dir, rewrite_command};
