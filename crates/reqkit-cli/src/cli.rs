//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use reqkit::HttpConfig;

use crate::commands::{GetCommand, PostCommand};
use crate::error::CliError;

/// reqkit - issue HTTP requests from the command line
#[derive(Debug, Parser)]
#[command(
    name = "reqkit",
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a YAML client configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "REQKIT_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a GET request
    Get(GetCommand),

    /// Send a POST request
    Post(PostCommand),
}

impl Cli {
    /// Load client configuration from the given file, or the environment
    pub fn load_config(&self) -> Result<HttpConfig, CliError> {
        let config = match &self.config {
            Some(path) => HttpConfig::from_yaml_file(path)?.with_env_overrides()?,
            None => HttpConfig::from_env()?,
        };
        Ok(config)
    }

    /// Execute the selected command
    pub async fn execute(self, config: HttpConfig) -> Result<(), CliError> {
        let ctx = CommandContext {
            config,
            format: self.format,
        };

        match self.command {
            Command::Get(cmd) => cmd.execute(&ctx).await,
            Command::Post(cmd) => cmd.execute(&ctx).await,
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: HttpConfig,
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from([
            "reqkit",
            "-vv",
            "get",
            "https://example.com",
            "-H",
            "Accept: application/json",
            "-p",
            "id=1",
            "--retries",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Get(cmd) => {
                assert_eq!(cmd.request.url, "https://example.com");
                assert_eq!(cmd.request.retries, Some(3));
                assert_eq!(
                    cmd.request.headers,
                    vec![("Accept".to_string(), "application/json".to_string())]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_post_with_form() {
        let cli = Cli::try_parse_from([
            "reqkit",
            "--format",
            "json",
            "post",
            "https://example.com/login",
            "--form",
            "-p",
            "user=alice",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Post(ref cmd) if cmd.form));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["reqkit", "-q", "-v", "get", "https://example.com"]);
        assert!(result.is_err());
    }
}
