//! Fetch settings shared by all session strategies.
//!
//! Settings are resolved once at startup; the chosen [`StrategyKind`]
//! decides which strategy [`crate::build_strategy`] returns.

use std::path::PathBuf;
use std::time::Duration;

use boostbot_core::StrategyKind;
use url::Url;

use crate::retry::BackoffPolicy;

/// Default bounded wait for every network-issuing step.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Challenge Settings
// ============================================================================

/// Settings for the challenge-aware strategy.
#[derive(Debug, Clone)]
pub struct ChallengeSettings {
    /// Pause before the first request of a new session.
    pub initial_delay: Duration,
    /// Retry policy while the warm-up request keeps hitting a challenge.
    pub backoff: BackoffPolicy,
}

impl Default for ChallengeSettings {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            backoff: BackoffPolicy::default(),
        }
    }
}

// ============================================================================
// Browser Settings
// ============================================================================

/// Settings for the browser-driven strategy.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Run without a visible window.
    pub headless: bool,
    /// Explicit Chrome/Chromium executable; auto-detected when `None`.
    pub executable: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
        }
    }
}

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for opening sessions against one site.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Which strategy tier to use.
    pub strategy: StrategyKind,
    /// Site root, used for warm-up requests.
    pub site_root: Url,
    /// Hosts that sessions may talk to. Empty means unrestricted.
    pub allowed_domains: Vec<String>,
    /// Bounded wait for each network step.
    pub timeout: Duration,
    /// Challenge-aware strategy settings.
    pub challenge: ChallengeSettings,
    /// Browser strategy settings.
    pub browser: BrowserSettings,
}

impl FetchSettings {
    /// Creates settings for the given site root, restricting sessions to
    /// its host.
    pub fn new(site_root: Url) -> Self {
        let allowed_domains = site_root
            .host_str()
            .map(|host| vec![host.to_string()])
            .unwrap_or_default();

        Self {
            strategy: StrategyKind::default(),
            site_root,
            allowed_domains,
            timeout: DEFAULT_TIMEOUT,
            challenge: ChallengeSettings::default(),
            browser: BrowserSettings::default(),
        }
    }

    /// Sets the strategy tier.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the per-step timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the challenge-aware strategy settings.
    pub fn with_challenge(mut self, challenge: ChallengeSettings) -> Self {
        self.challenge = challenge;
        self
    }

    /// Sets the browser strategy settings.
    pub fn with_browser(mut self, browser: BrowserSettings) -> Self {
        self.browser = browser;
        self
    }

}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_restricts_to_site_host() {
        let settings = FetchSettings::new("https://animestars.org/".parse().unwrap());
        assert_eq!(settings.allowed_domains, vec!["animestars.org".to_string()]);
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
        assert_eq!(settings.strategy, StrategyKind::Challenge);
    }

    #[test]
    fn test_builder_methods() {
        let settings = FetchSettings::new("http://127.0.0.1:8080/".parse().unwrap())
            .with_strategy(StrategyKind::Plain)
            .with_timeout(Duration::from_secs(5));

        assert_eq!(settings.strategy, StrategyKind::Plain);
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.allowed_domains, vec!["127.0.0.1".to_string()]);
    }
}
