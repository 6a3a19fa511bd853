//! Get command implementation.

use clap::Parser;
use reqkit::Method;

use crate::args::RequestArgs;
use crate::cli::CommandContext;
use crate::error::CliError;

/// Send a GET request; parameters become the query string
#[derive(Debug, Parser)]
pub struct GetCommand {
    #[command(flatten)]
    pub request: RequestArgs,
}

impl GetCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let options = self.request.to_options();
        super::send(ctx, Method::GET, &self.request.url, options, self.request.include).await
    }
}
