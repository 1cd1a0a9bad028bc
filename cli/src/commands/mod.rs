//! Command implementations

pub mod exec;
