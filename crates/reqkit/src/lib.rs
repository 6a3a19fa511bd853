//! Fluent HTTP request helpers.
//!
//! `reqkit` builds a request from a URL and a [`RequestOptions`] value,
//! executes it with a freshly configured `reqwest` client and hands back a
//! fully buffered [`Response`].
//!
//! ```no_run
//! use reqkit::RequestOptions;
//!
//! # async fn demo() -> Result<(), reqkit::HttpError> {
//! let resp = reqkit::get(
//!     "https://example.com/api",
//!     RequestOptions::new().param("mode", "extended"),
//! )
//! .await?;
//! println!("{} {}", resp.status_code(), resp.text());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod retry;
pub mod session;

pub use client::{build_client, HttpConfig, TlsConfig};
pub use config::ConfigError;
pub use error::HttpError;
pub use request::{headers, Body, Params, RequestDescriptor, RequestOptions, Values};
pub use reqwest::{header::HeaderMap, tls::Version as TlsVersion, Method, StatusCode};
pub use response::Response;
pub use retry::RetryPolicy;
pub use session::Session;

use serde::de::DeserializeOwned;

/// Issue a GET request with default client settings.
pub async fn get(url: &str, options: RequestOptions) -> Result<Response, HttpError> {
    Session::default().get(url, options).await
}

/// Issue a GET request and decode the JSON body into `T`.
pub async fn get_json<T: DeserializeOwned>(
    url: &str,
    options: RequestOptions,
) -> Result<T, HttpError> {
    Session::default().get_json(url, options).await
}

/// Issue a POST request with default client settings.
pub async fn post(url: &str, options: RequestOptions) -> Result<Response, HttpError> {
    Session::default().post(url, options).await
}

/// Issue a POST request and decode the JSON body into `T`.
pub async fn post_json<T: DeserializeOwned>(
    url: &str,
    options: RequestOptions,
) -> Result<T, HttpError> {
    Session::default().post_json(url, options).await
}

/// Issue a request with an arbitrary method.
///
/// Methods other than GET follow the POST body rules.
pub async fn request(
    method: Method,
    url: &str,
    options: RequestOptions,
) -> Result<Response, HttpError> {
    Session::default().request(method, url, options).await
}
