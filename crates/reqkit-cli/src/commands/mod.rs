//! Command implementations.

mod get;
mod post;

pub use get::GetCommand;
pub use post::PostCommand;

use reqkit::{Method, RequestOptions, Session};
use reqkit_log::spans::{record_error, request_span, Timer};
use tracing::Instrument;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_response, ResponseOutput};

/// Send one request through a session built from the context config
async fn send(
    ctx: &CommandContext,
    method: Method,
    url: &str,
    options: RequestOptions,
    include: bool,
) -> Result<(), CliError> {
    let session = Session::with_config(ctx.config.clone());
    let timer = Timer::start("request");

    let span = request_span(method.as_str(), url);
    let response = session
        .request(method.clone(), url, options)
        .instrument(span.clone())
        .await
        .map_err(|e| {
            span.in_scope(|| record_error(&e));
            e
        })?;

    let elapsed = timer.finish();
    tracing::info!(
        status = response.status_code(),
        elapsed_ms = %elapsed.as_millis(),
        "{} {}",
        method,
        url
    );

    print_response(ctx, &ResponseOutput::new(&response, include))
}
