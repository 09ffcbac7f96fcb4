//! Target page extraction.

use std::sync::Arc;

use boostbot_core::{CardSnapshot, SnapshotStatus};
use boostbot_fetch::SessionHandle;
use tracing::{instrument, warn};

use crate::descriptor::SiteDescriptor;
use crate::error::{SiteError, fetch_status};
use crate::parser::CardParser;

/// Fetches the target page through an authenticated session and parses
/// the card out of it.
#[derive(Debug)]
pub struct CardExtractor {
    site: Arc<SiteDescriptor>,
    parser: CardParser,
}

impl CardExtractor {
    /// Creates an extractor, compiling the descriptor's selectors.
    pub fn new(site: Arc<SiteDescriptor>) -> Result<Self, SiteError> {
        let parser = CardParser::new(&site.selectors)?;
        Ok(Self { site, parser })
    }

    /// Reads the current card.
    ///
    /// Never fails: every problem becomes the snapshot's status. A response
    /// that lands on the login page yields `AuthFailed`, which tells the
    /// caller to log in again before the next attempt.
    #[instrument(skip(self, handle), fields(target = %self.site.target_url))]
    pub async fn extract(&self, handle: &mut SessionHandle) -> CardSnapshot {
        let page = match handle.fetch(self.site.target_url.as_str()).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "Target page request failed");
                return CardSnapshot::failed(fetch_status(&e));
            }
        };

        if self.site.is_login_location(&page.url) {
            warn!(location = %page.url, "Session expired; redirected to login");
            return CardSnapshot::failed(SnapshotStatus::AuthFailed);
        }

        if !page.is_success() {
            warn!(status = page.status, "Target page not available");
            return CardSnapshot::failed(SnapshotStatus::PageUnavailable);
        }

        self.parser.parse(&page.body)
    }
}
