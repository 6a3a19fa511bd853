//! reqkit CLI library
//!
//! Argument definitions and commands behind the `reqkit` binary.

pub mod args;
pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
