//! Sessions: shared client settings plus default options.

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::Instrument;

use crate::client::{build_client, execute, HttpConfig};
use crate::error::HttpError;
use crate::request::{RequestDescriptor, RequestOptions};
use crate::response::Response;
use crate::retry::RetryPolicy;

/// Client settings and default options reused across calls.
///
/// Calls never mutate the session: each one layers its own options over the
/// defaults into a fresh value, so a session can be cloned or shared freely.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: HttpConfig,
    defaults: RequestOptions,
}

impl Session {
    /// Create a session with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with custom config.
    pub fn with_config(config: HttpConfig) -> Self {
        Self {
            config,
            defaults: RequestOptions::default(),
        }
    }

    /// Set options applied to every call before its own options.
    pub fn with_defaults(mut self, defaults: RequestOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub fn defaults(&self) -> &RequestOptions {
        &self.defaults
    }

    /// Make a GET request.
    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<Response, HttpError> {
        self.request(Method::GET, url, options).await
    }

    /// Make a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, HttpError> {
        self.get(url, options).await?.json()
    }

    /// Make a POST request.
    pub async fn post(&self, url: &str, options: RequestOptions) -> Result<Response, HttpError> {
        self.request(Method::POST, url, options).await
    }

    /// Make a POST request and decode the JSON body.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, HttpError> {
        self.post(url, options).await?.json()
    }

    /// Resolve, send and retry a request.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response, HttpError> {
        let options = self.defaults.clone().merge(options);
        let descriptor = RequestDescriptor::resolve(method, url, &options, self.config.timeout)?;
        let policy = RetryPolicy::new(options.retry_count().unwrap_or(self.config.retries))
            .with_expected_status(options.expected_status());
        let client = build_client(&self.config, descriptor.timeout, &descriptor.tls)?;
        let debug = options.is_debug();

        let span = tracing::debug_span!(
            "http_request",
            method = %descriptor.method,
            url = %descriptor.url
        );
        policy
            .run(|_| execute(&client, &descriptor, debug))
            .instrument(span)
            .await
    }
}
