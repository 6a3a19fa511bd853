//! HTTP errors.

use reqwest::StatusCode;

/// Errors returned by request construction, transport and decoding.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header {name:?}: {message}")]
    InvalidHeader { name: String, message: String },

    #[error("failed to encode JSON body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid TLS certificate: {0}")]
    Certificate(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("failed to read response body: {0}")]
    Read(#[source] reqwest::Error),

    #[error("unexpected status: expected {expected}, got {actual}")]
    UnexpectedStatus {
        expected: StatusCode,
        actual: StatusCode,
        body: String,
    },

    #[error("failed to decode JSON (status {status}): {source}")]
    Decode {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HttpError {
    /// Whether another attempt could succeed.
    ///
    /// Construction and decode errors fail identically on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HttpError::Request(_)
                | HttpError::Timeout
                | HttpError::Read(_)
                | HttpError::UnexpectedStatus { .. }
        )
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else if e.is_body() || e.is_decode() {
            HttpError::Read(e)
        } else {
            HttpError::Request(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display() {
        let err = HttpError::UnexpectedStatus {
            expected: StatusCode::OK,
            actual: StatusCode::SERVICE_UNAVAILABLE,
            body: "down".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("200"));
        assert!(message.contains("503"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_construction_errors_are_not_retryable() {
        let parse = url::Url::parse("not a url").unwrap_err();
        let err = HttpError::InvalidUrl {
            url: "not a url".to_string(),
            source: parse,
        };
        assert!(!err.is_retryable());

        let header = HttpError::InvalidHeader {
            name: "bad header".to_string(),
            message: "invalid name".to_string(),
        };
        assert!(!header.is_retryable());
        assert!(header.to_string().contains("bad header"));
    }

    #[test]
    fn test_decode_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = HttpError::Decode {
            status: 400,
            body: "{oops".to_string(),
            source,
        };
        let message = format!("{}", err);
        assert!(message.contains("failed to decode JSON"));
        assert!(message.contains("status 400"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_encode_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = HttpError::Encode(source);
        assert!(err.to_string().starts_with("failed to encode JSON body"));
    }
}
