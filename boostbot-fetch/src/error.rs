//! Fetch error types.

use thiserror::Error;

/// Error type for session and transport operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A network step exceeded its bounded wait.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The site kept answering with an anti-automation interstitial.
    #[error("Challenge not passed: {0}")]
    ChallengeFailed(String),

    /// Browser automation failed.
    #[error("Browser error: {0}")]
    Browser(String),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Returns true if this is a transport-level failure (connection,
    /// timeout, I/O) as opposed to a site or setup problem.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout(_))
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}

impl From<chromiumoxide::error::CdpError> for FetchError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        FetchError::Browser(err.to_string())
    }
}
