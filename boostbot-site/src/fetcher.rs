//! Boosted card fetcher.
//!
//! This module provides the entry point the rest of the bot uses. It pairs
//! the [`Authenticator`] with the [`CardExtractor`] and owns the session
//! between calls:
//!
//! 1. Reuse the open session, or open one and log in
//! 2. Extract the card
//! 3. Drop the session when the extraction reports an expired login
//!
//! # Example
//!
//! ```ignore
//! let site = SiteDescriptor::animestars()?;
//! let strategy = build_strategy(&FetchSettings::new(site.site_root()));
//! let mut fetcher = BoostFetcher::new(site, credentials, strategy)?;
//! let snapshot = fetcher.fetch().await;
//! ```

use std::sync::Arc;

use boostbot_core::{CardSnapshot, Credentials, SnapshotSource};
use boostbot_fetch::{SessionHandle, SessionStrategy, StrategyInfo};
use tracing::{debug, info, instrument, warn};

use crate::auth::Authenticator;
use crate::descriptor::SiteDescriptor;
use crate::error::SiteError;
use crate::extract::CardExtractor;

// ============================================================================
// Fetcher
// ============================================================================

/// Logs in on demand and reads the boosted card.
pub struct BoostFetcher {
    strategy: Box<dyn SessionStrategy>,
    authenticator: Authenticator,
    extractor: CardExtractor,
    session: Option<SessionHandle>,
}

impl BoostFetcher {
    /// Creates a fetcher. No network traffic happens until the first fetch.
    pub fn new(
        site: SiteDescriptor,
        credentials: Credentials,
        strategy: Box<dyn SessionStrategy>,
    ) -> Result<Self, SiteError> {
        let site = Arc::new(site);
        Ok(Self {
            strategy,
            authenticator: Authenticator::new(Arc::clone(&site), credentials),
            extractor: CardExtractor::new(site)?,
            session: None,
        })
    }

    /// The strategy sessions are opened with.
    pub fn strategy_info(&self) -> StrategyInfo {
        StrategyInfo::from_strategy(self.strategy.as_ref())
    }

    /// Returns true if a logged-in session is being kept.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Fetches the current card. Failures are reported through the
    /// snapshot's status.
    #[instrument(skip(self), fields(strategy = %self.strategy.id()))]
    pub async fn fetch(&mut self) -> CardSnapshot {
        let mut handle = match self.session.take() {
            Some(handle) => {
                debug!(
                    requests = handle.request_count(),
                    opened_at = %handle.opened_at(),
                    "Reusing session"
                );
                handle
            }
            None => match self.authenticator.authenticate(self.strategy.as_ref()).await {
                Ok(handle) => handle,
                Err(e) => {
                    warn!(error = %e, "Authentication failed");
                    return CardSnapshot::failed(e.status());
                }
            },
        };

        let snapshot = self.extractor.extract(&mut handle).await;

        if snapshot.requires_reauth() {
            info!("Session expired; discarding it");
            handle.close().await;
        } else {
            self.session = Some(handle);
        }

        snapshot
    }

    /// Closes the kept session, if any.
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.session.take() {
            handle.close().await;
        }
    }
}

impl SnapshotSource for BoostFetcher {
    async fn fetch_snapshot(&mut self) -> CardSnapshot {
        self.fetch().await
    }
}

impl std::fmt::Debug for BoostFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoostFetcher")
            .field("strategy", &self.strategy.id())
            .field("authenticator", &self.authenticator)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
