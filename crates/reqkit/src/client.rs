//! HTTP client configuration and transport.

use reqwest::{tls, Certificate, Client, ClientBuilder};
use std::time::Duration;

use crate::error::HttpError;
use crate::request::RequestDescriptor;
use crate::response::Response;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Timeout applied when a request does not set its own.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Enable gzip decompression.
    pub gzip: bool,
    /// Attempts made when a request does not set its own count.
    pub retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("reqkit/{}", env!("CARGO_PKG_VERSION")),
            gzip: true,
            retries: 1,
        }
    }
}

/// TLS settings for a single request.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Skip certificate verification entirely.
    pub accept_invalid_certs: bool,
    /// Extra trusted roots, PEM encoded.
    pub root_certificates: Vec<Vec<u8>>,
    /// Lowest protocol version to negotiate.
    pub min_version: Option<tls::Version>,
}

impl TlsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable certificate verification. Only meant for local testing.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Trust an additional PEM encoded root certificate.
    pub fn add_root_certificate(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.root_certificates.push(pem.into());
        self
    }

    /// Require at least the given protocol version.
    pub fn min_version(mut self, version: tls::Version) -> Self {
        self.min_version = Some(version);
        self
    }

    fn apply(&self, mut builder: ClientBuilder) -> Result<ClientBuilder, HttpError> {
        for pem in &self.root_certificates {
            let cert = Certificate::from_pem(pem).map_err(HttpError::Certificate)?;
            builder = builder.add_root_certificate(cert);
        }
        if let Some(version) = self.min_version {
            builder = builder.min_tls_version(version);
        }
        Ok(builder.danger_accept_invalid_certs(self.accept_invalid_certs))
    }
}

/// Build a client for one call.
///
/// Idle connections are never pooled, so no transport state outlives the call.
/// A zero `timeout` leaves the call unbounded.
pub fn build_client(
    config: &HttpConfig,
    timeout: Duration,
    tls: &TlsConfig,
) -> Result<Client, HttpError> {
    let mut builder = ClientBuilder::new()
        .user_agent(&config.user_agent)
        .pool_max_idle_per_host(0)
        .gzip(config.gzip);
    if !timeout.is_zero() {
        builder = builder.connect_timeout(timeout).timeout(timeout);
    }

    tls.apply(builder)?.build().map_err(HttpError::ClientBuild)
}

/// Send one attempt of `descriptor` and buffer the response.
pub(crate) async fn execute(
    client: &Client,
    descriptor: &RequestDescriptor,
    debug: bool,
) -> Result<Response, HttpError> {
    tracing::debug!("Sending {} request to: {}", descriptor.method, descriptor.url);
    if debug {
        tracing::info!(
            method = %descriptor.method,
            url = %descriptor.url,
            headers = ?descriptor.headers,
            body = %descriptor.body.preview(),
            "request"
        );
    }

    let response = descriptor.to_request(client).send().await?;
    let response = Response::read(response).await?;

    tracing::debug!("{} response: {} {}", descriptor.method, response.status(), descriptor.url);
    if debug {
        tracing::info!(
            status = response.status_code(),
            headers = ?response.headers(),
            body = %response.text(),
            "response"
        );
    }
    Ok(response)
}
