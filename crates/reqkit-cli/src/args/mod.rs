//! Argument parsing utilities and common argument types.

mod parsers;

pub use parsers::*;

use std::time::Duration;

use clap::{Args, ValueHint};
use reqkit::{Params, RequestOptions, StatusCode, TlsConfig, Values};

/// Arguments shared by every request command
#[derive(Debug, Clone, Args)]
pub struct RequestArgs {
    /// Request URL
    #[arg(value_hint = ValueHint::Url)]
    pub url: String,

    /// Header as `Name: value` (can be repeated)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Parameter as `key=value`; values that parse as JSON are sent as JSON
    #[arg(short = 'p', long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Pre-encoded query value as `key=value` (can be repeated)
    #[arg(short = 'Q', long = "query", value_parser = parse_key_value)]
    pub query: Vec<(String, String)>,

    /// Request timeout (e.g. 500ms, 10s, 1m)
    #[arg(short, long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Total number of attempts
    #[arg(long)]
    pub retries: Option<u32>,

    /// Retry until this status is returned
    #[arg(long, value_parser = parse_status)]
    pub expect_status: Option<StatusCode>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Log request and response dumps
    #[arg(long)]
    pub debug: bool,

    /// Print status line and headers before the body
    #[arg(short, long)]
    pub include: bool,
}

impl RequestArgs {
    /// Fold the arguments into request options
    pub fn to_options(&self) -> RequestOptions {
        let mut options = RequestOptions::new()
            .headers(self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .debug(self.debug);

        if !self.params.is_empty() {
            let params: Params = self
                .params
                .iter()
                .map(|(k, v)| (k.clone(), parse_param_value(v)))
                .collect();
            options = options.params(params);
        }
        if !self.query.is_empty() {
            let values: Values = self.query.iter().cloned().collect();
            options = options.query(values);
        }
        if let Some(timeout) = self.timeout {
            options = options.timeout(timeout);
        }
        if let Some(retries) = self.retries {
            options = options.retries(retries);
        }
        if let Some(status) = self.expect_status {
            options = options.expect_status(status);
        }
        if self.insecure {
            options = options.tls(TlsConfig::new().danger_accept_invalid_certs(true));
        }
        options
    }
}
