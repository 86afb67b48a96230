//! GitHub API error handling.

use thiserror::Error;

/// GitHub REST API errors.
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Repository was not given as `owner/name`.
    #[error("Invalid repository '{0}'. Expected owner/name")]
    InvalidRepository(String),

    /// API base URL could not be used to build endpoints.
    #[error("Invalid GitHub API URL: {0}")]
    InvalidUrl(String),

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// GitHub answered with a non-success status.
    #[error("GitHub API request failed: HTTP {status}: {body}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Response body did not have the expected shape.
    #[error("Invalid response format from GitHub API: {0}")]
    InvalidResponseFormat(String),
}

impl GitHubError {
    /// Whether repeating the same request could succeed.
    ///
    /// Client errors other than 429 (rate limited) are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ApiRequestFailed { status, .. } => {
                *status == 429 || !(400..500).contains(status)
            }
            Self::NetworkError(_) => true,
            Self::InvalidRepository(_) | Self::InvalidUrl(_) | Self::InvalidResponseFormat(_) => {
                false
            }
        }
    }
}
