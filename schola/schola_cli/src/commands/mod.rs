//! Subcommands of the `schola` binary.

pub mod config;
pub mod run;
