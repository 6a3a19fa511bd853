//! HTTP response types.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

use crate::error::HttpError;

/// A fully buffered response.
///
/// The body has been read to the end and the connection released before a
/// `Response` exists, so it holds no transport resources.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Build a response from parts.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Drain a `reqwest` response into memory.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, HttpError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(HttpError::Read)?;
        Ok(Self::from_parts(status, headers, body))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text; invalid sequences become U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as JSON. Decoded again on every call.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(|e| HttpError::Decode {
            status: self.status.as_u16(),
            body: self.text().into_owned(),
            source: e,
        })
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }
}
