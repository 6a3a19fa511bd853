//! reqkit CLI
//!
//! Main entry point for the `reqkit` binary.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use reqkit_cli::cli::Cli;
use reqkit_cli::CliError;
use reqkit_log::{LogConfig, LogLevel};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: LogLevel::from_verbosity(cli.verbose, cli.quiet),
        ..LogConfig::default()
    }
    .with_env_overrides();
    if let Err(e) = reqkit_log::init(log_config) {
        eprintln!("warning: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.code(), "{e}");
            eprintln!("error[{}]: {e}", e.code());
            e.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async move {
        let config = cli.load_config()?;
        cli.execute(config).await
    })
}
