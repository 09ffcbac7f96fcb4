//! The three session strategy tiers.

use async_trait::async_trait;
use boostbot_core::StrategyKind;
use tracing::{debug, info, instrument, warn};

use crate::context::FetchSettings;
use crate::error::FetchError;
use crate::host::browser::BrowserTransport;
use crate::host::challenge::{CHROME_USER_AGENT, fingerprint_headers, looks_like_challenge};
use crate::host::http::{DomainAllowlist, HttpOptions, HttpTransport};
use crate::session::SessionHandle;
use crate::strategy::SessionStrategy;

fn allowlist(settings: &FetchSettings) -> DomainAllowlist {
    DomainAllowlist::new(settings.allowed_domains.clone())
}

// ============================================================================
// Plain Strategy
// ============================================================================

/// Direct HTTP session with a cookie jar.
pub struct PlainStrategy {
    settings: FetchSettings,
}

impl PlainStrategy {
    /// Creates a new plain strategy.
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SessionStrategy for PlainStrategy {
    fn id(&self) -> &str {
        "http.plain"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Plain
    }

    async fn open(&self) -> Result<SessionHandle, FetchError> {
        let transport = HttpTransport::with_options(HttpOptions {
            timeout: self.settings.timeout,
            allowlist: allowlist(&self.settings),
            ..HttpOptions::default()
        })?;

        debug!("Opened plain HTTP session");
        Ok(SessionHandle::new(
            self.kind(),
            Box::new(transport),
            self.settings.timeout,
        ))
    }
}

// ============================================================================
// Challenge Strategy
// ============================================================================

/// HTTP session that looks like a desktop browser and waits out
/// interstitial bot checks before handing the session over.
pub struct ChallengeStrategy {
    settings: FetchSettings,
}

impl ChallengeStrategy {
    /// Creates a new challenge-aware strategy.
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SessionStrategy for ChallengeStrategy {
    fn id(&self) -> &str {
        "http.challenge"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Challenge
    }

    #[instrument(skip(self), fields(root = %self.settings.site_root))]
    async fn open(&self) -> Result<SessionHandle, FetchError> {
        let transport = HttpTransport::with_options(HttpOptions {
            timeout: self.settings.timeout,
            user_agent: CHROME_USER_AGENT.to_string(),
            default_headers: fingerprint_headers(),
            allowlist: allowlist(&self.settings),
        })?;
        let mut handle =
            SessionHandle::new(self.kind(), Box::new(transport), self.settings.timeout);

        let challenge = &self.settings.challenge;
        if !challenge.initial_delay.is_zero() {
            debug!(delay = ?challenge.initial_delay, "Waiting before warm-up request");
            tokio::time::sleep(challenge.initial_delay).await;
        }

        let root = self.settings.site_root.as_str();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let page = handle.fetch(root).await?;

            if !looks_like_challenge(page.status, &page.body) {
                info!(attempt, status = page.status, "Warm-up passed");
                return Ok(handle);
            }

            if !challenge.backoff.allows_another(attempt) {
                warn!(attempt, status = page.status, "Challenge persisted");
                handle.close().await;
                return Err(FetchError::ChallengeFailed(format!(
                    "interstitial still served after {attempt} attempts (status {})",
                    page.status
                )));
            }

            let delay = challenge.backoff.delay_for_attempt(attempt);
            warn!(
                attempt,
                status = page.status,
                delay = ?delay,
                "Challenge page served, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

// ============================================================================
// Browser Strategy
// ============================================================================

/// Headless browser session; page scripts execute, so script-based
/// challenges pass. Slower and heavier than the HTTP tiers.
pub struct BrowserStrategy {
    settings: FetchSettings,
}

impl BrowserStrategy {
    /// Creates a new browser strategy.
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SessionStrategy for BrowserStrategy {
    fn id(&self) -> &str {
        "browser.chrome"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Browser
    }

    async fn open(&self) -> Result<SessionHandle, FetchError> {
        let browser = &self.settings.browser;
        let timeout = self.settings.timeout;

        let launch = BrowserTransport::launch(
            browser.headless,
            browser.executable.clone(),
            timeout,
            allowlist(&self.settings),
        );
        let transport = tokio::time::timeout(timeout, launch)
            .await
            .map_err(|_| FetchError::Timeout(timeout.as_secs()))??;

        Ok(SessionHandle::new(self.kind(), Box::new(transport), timeout))
    }
}
