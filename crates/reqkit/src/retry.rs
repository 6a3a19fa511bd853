//! Fixed-count retry keyed on an expected status.
//!
//! Attempts run back to back with no delay. A transport failure or a status
//! other than the expected one consumes an attempt; once attempts run out
//! the last error is returned.

use reqwest::StatusCode;
use std::future::Future;
use tracing::debug;

use crate::error::HttpError;
use crate::response::Response;

/// Retry configuration for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    expected_status: Option<StatusCode>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RetryPolicy {
    /// Make at most `attempts` attempts; zero is treated as one.
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
            expected_status: None,
        }
    }

    /// Require `status` for an attempt to count as successful.
    pub fn with_expected_status(mut self, status: Option<StatusCode>) -> Self {
        self.expected_status = status;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn expected_status(&self) -> Option<StatusCode> {
        self.expected_status
    }

    /// Reject a response whose status differs from the expected one.
    pub fn check(&self, response: Response) -> Result<Response, HttpError> {
        match self.expected_status {
            Some(expected) if response.status() != expected => {
                Err(HttpError::UnexpectedStatus {
                    expected,
                    actual: response.status(),
                    body: response.text().into_owned(),
                })
            }
            _ => Ok(response),
        }
    }

    /// Run `operation` until it succeeds or attempts are exhausted.
    ///
    /// `operation` receives the 1-based attempt number.
    pub async fn run<F, Fut>(&self, mut operation: F) -> Result<Response, HttpError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Response, HttpError>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await.and_then(|r| self.check(r)) {
                Ok(response) => {
                    if attempt > 1 {
                        debug!("Request succeeded on attempt {}", attempt);
                    }
                    return Ok(response);
                }
                Err(e) if e.is_retryable() && attempt < self.attempts => {
                    debug!(
                        "Request failed (attempt {}/{}), retrying: {}",
                        attempt, self.attempts, e
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
