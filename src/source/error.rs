//! Error types for backend requests.

use std::fmt;

use thiserror::Error;

use crate::data::MergeError;

/// The two backend endpoints polled each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Data,
    Metrics,
}

impl Endpoint {
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Data => "data",
            Endpoint::Metrics => "metrics",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors that can occur while refreshing one field of the dashboard.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Backend unreachable.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Backend answered with a non-success status.
    #[error("Backend returned status {0}")]
    Status(u16),

    /// Any other transport failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Body did not match the endpoint schema.
    #[error("Malformed {endpoint} payload: {source}")]
    Payload {
        endpoint: Endpoint,
        source: serde_json::Error,
    },

    /// Payload decoded but could not be merged.
    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_connect() {
            SourceError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else {
            SourceError::Http(err.to_string())
        }
    }
}
