//! Login handshake.
//!
//! The handshake runs `Start -> FormFetched -> Submitted -> {Verified,
//! Rejected}`:
//!
//! 1. GET the login endpoint
//! 2. Locate the login form and collect its hidden inputs
//! 3. POST hidden fields, fixed fields, and credentials to the form action
//! 4. Verify that the response landed somewhere other than the login page
//!
//! The site re-renders the login form with HTTP 200 on bad credentials, so
//! a 2xx status alone is never proof of a login.

use std::fmt;
use std::sync::Arc;

use boostbot_core::Credentials;
use boostbot_fetch::host::challenge::CLEARANCE_COOKIE;
use boostbot_fetch::{SessionHandle, SessionStrategy};
use tracing::{debug, info, instrument, warn};

use crate::descriptor::SiteDescriptor;
use crate::error::AuthError;
use crate::form::LoginFormState;

// ============================================================================
// Handshake State
// ============================================================================

/// Stage of a login handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Nothing sent yet.
    Start,
    /// Login page fetched and form parsed.
    FormFetched,
    /// Credentials posted.
    Submitted,
    /// Landed outside the login page.
    Verified,
    /// Still on the login page, or the attempt failed.
    Rejected,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::FormFetched => "form_fetched",
            Self::Submitted => "submitted",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Authenticator
// ============================================================================

/// Drives the login handshake over a session handle.
#[derive(Clone)]
pub struct Authenticator {
    site: Arc<SiteDescriptor>,
    credentials: Credentials,
}

impl Authenticator {
    /// Creates an authenticator for `site`.
    pub fn new(site: Arc<SiteDescriptor>, credentials: Credentials) -> Self {
        Self { site, credentials }
    }

    /// Opens a session through `strategy` and logs it in.
    ///
    /// The session is closed before returning if the login fails.
    pub async fn authenticate(
        &self,
        strategy: &dyn SessionStrategy,
    ) -> Result<SessionHandle, AuthError> {
        let mut handle = strategy.open().await?;

        match self.login(&mut handle).await {
            Ok(()) => Ok(handle),
            Err(e) => {
                handle.close().await;
                Err(e)
            }
        }
    }

    /// Runs the handshake on an already opened session.
    #[instrument(
        skip(self, handle),
        fields(site = %self.site.name, user = %self.credentials.username())
    )]
    pub async fn login(&self, handle: &mut SessionHandle) -> Result<(), AuthError> {
        let mut state = AuthState::Start;
        let login_url = self.site.login_url.as_str();

        let page = handle.fetch(login_url).await.inspect_err(|e| {
            warn!(%state, error = %e, "Login page request failed");
        })?;
        if !page.is_success() {
            warn!(%state, status = page.status, "Login page not available");
            return Err(AuthError::LoginPage(page.status));
        }

        let form = LoginFormState::parse(&page.body, &page.url, &self.site).map_err(|e| {
            warn!(
                %state,
                url = %page.url,
                error = %e,
                "Login form not usable; page markup may have changed"
            );
            AuthError::FormNotFound(page.url.to_string())
        })?;
        state = AuthState::FormFetched;
        debug!(%state, hidden = form.hidden_fields.len(), "Login form parsed");

        let payload = form.payload(&self.site, &self.credentials);
        let response = handle
            .submit_form(form.action_url.as_str(), &payload)
            .await?;
        state = AuthState::Submitted;
        debug!(%state, status = response.status, location = %response.url, "Credentials submitted");

        if handle.has_cookie(login_url, CLEARANCE_COOKIE).await {
            debug!("Clearance cookie present");
        }

        if response.is_success() && !self.site.is_login_location(&response.url) {
            state = AuthState::Verified;
            info!(%state, location = %response.url, "Logged in");
            Ok(())
        } else {
            state = AuthState::Rejected;
            warn!(%state, status = response.status, location = %response.url, "Login rejected");
            Err(AuthError::Rejected {
                status: response.status,
                location: response.url.to_string(),
            })
        }
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("site", &self.site.name)
            .field("credentials", &self.credentials)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
