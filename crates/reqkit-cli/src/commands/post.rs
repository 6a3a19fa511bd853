//! Post command implementation.

use clap::Parser;
use reqkit::Method;

use crate::args::RequestArgs;
use crate::cli::CommandContext;
use crate::error::CliError;

/// Send a POST request; parameters are sent as JSON unless `--form` is given
#[derive(Debug, Parser)]
pub struct PostCommand {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Form-encode parameters instead of sending JSON
    #[arg(long)]
    pub form: bool,

    /// Raw request body; takes precedence over parameters
    #[arg(short, long, conflicts_with = "form")]
    pub data: Option<String>,
}

impl PostCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let mut options = self.request.to_options();
        if self.form {
            options = options.form_content();
        }
        if let Some(data) = &self.data {
            options = options.body(data.clone());
        }
        super::send(ctx, Method::POST, &self.request.url, options, self.request.include).await
    }
}
