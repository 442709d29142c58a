//! Error types for the jenkins-mcp server

use thiserror::Error;

/// Maximum number of response body characters carried in an API error
pub const ERROR_BODY_LIMIT: usize = 500;

/// Main error type for Jenkins API calls
#[derive(Error, Debug)]
pub enum JenkinsError {
    #[error("Jenkins API error: {status} {status_text}: {body}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl JenkinsError {
    /// Build an API error, keeping at most `ERROR_BODY_LIMIT` characters of the body
    pub fn api(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Api {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, JenkinsError>;
