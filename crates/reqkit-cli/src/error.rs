//! CLI error handling.

use std::io;
use std::process::ExitCode;

use reqkit::{ConfigError, HttpError};
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Http(#[from] HttpError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E001",
            Self::Io(_) => "E002",
            Self::Http(e) if e.is_retryable() => "E003",
            Self::Http(_) => "E004",
            Self::Format(_) => "E005",
            Self::Other(_) => "E999",
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        let code = match self {
            Self::Config(_) => 2,
            Self::Io(_) => 3,
            Self::Http(e) if e.is_retryable() => 4,
            Self::Http(_) => 5,
            Self::Format(_) | Self::Other(_) => 1,
        };
        ExitCode::from(code)
    }
}
