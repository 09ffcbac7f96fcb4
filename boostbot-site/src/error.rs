//! Site-specific errors.

use boostbot_core::SnapshotStatus;
use boostbot_fetch::FetchError;
use thiserror::Error;

/// Errors raised while setting up site access.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A configured CSS selector does not parse.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The offending selector.
        selector: String,
        /// Parser message.
        reason: String,
    },

    /// A configured URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No login form was found on the login page.
    #[error("Login form not found")]
    FormNotFound,
}

impl From<url::ParseError> for SiteError {
    fn from(err: url::ParseError) -> Self {
        SiteError::InvalidUrl(err.to_string())
    }
}

/// Why a login handshake did not reach the verified state.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The session could not be opened or a request failed.
    #[error("Session error: {0}")]
    Fetch(#[from] FetchError),

    /// The login page answered with a non-2xx status.
    #[error("Login page returned HTTP {0}")]
    LoginPage(u16),

    /// The login page has no recognizable login form.
    #[error("Login form not found on {0}")]
    FormNotFound(String),

    /// Credentials were submitted but the site kept us on the login page.
    #[error("Login rejected (HTTP {status}, landed on {location})")]
    Rejected {
        /// Status of the post-login response.
        status: u16,
        /// Final location of the post-login response.
        location: String,
    },
}

impl AuthError {
    /// Maps the failure onto the snapshot status reported to users.
    pub fn status(&self) -> SnapshotStatus {
        match self {
            Self::Rejected { .. } | Self::FormNotFound(_) => SnapshotStatus::AuthFailed,
            Self::LoginPage(_) => SnapshotStatus::NetworkError,
            Self::Fetch(err) => fetch_status(err),
        }
    }
}

/// Maps a transport failure onto a snapshot status.
pub fn fetch_status(err: &FetchError) -> SnapshotStatus {
    if err.is_network() {
        SnapshotStatus::NetworkError
    } else {
        SnapshotStatus::PageUnavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_mapping() {
        let rejected = AuthError::Rejected {
            status: 200,
            location: "https://animestars.org/login".into(),
        };
        assert_eq!(rejected.status(), SnapshotStatus::AuthFailed);
        assert_eq!(
            AuthError::FormNotFound("https://animestars.org/login".into()).status(),
            SnapshotStatus::AuthFailed
        );
        assert_eq!(AuthError::LoginPage(502).status(), SnapshotStatus::NetworkError);
        assert_eq!(
            AuthError::Fetch(FetchError::Timeout(30)).status(),
            SnapshotStatus::NetworkError
        );
        assert_eq!(
            AuthError::Fetch(FetchError::ChallengeFailed("503".into())).status(),
            SnapshotStatus::PageUnavailable
        );
    }
}
