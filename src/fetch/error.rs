//! Fetch error taxonomy.

use thiserror::Error;

/// Failure of a single upstream request.
///
/// `Clone` so that callers coalesced onto one in-flight request can each
/// receive the same outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection, DNS, TLS or body read failure
    #[error("Network error for {url}: {message}")]
    Transport { url: String, message: String },

    /// Non-2xx HTTP status
    #[error("HTTP error! status: {status} for {url}")]
    Status { url: String, status: u16 },

    /// Body decoded but carries an `error` field
    #[error("API error for {url}: {message}")]
    Application { url: String, message: String },

    /// Body was empty or JSON null
    #[error("No data received from {url}")]
    EmptyBody { url: String },

    /// Body was not valid JSON
    #[error("Parse error for {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Application { url, .. }
            | FetchError::EmptyBody { url }
            | FetchError::Decode { url, .. } => url,
        }
    }
}
