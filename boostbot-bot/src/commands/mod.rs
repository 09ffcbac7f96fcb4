//! CLI command implementations.

pub mod fetch;
pub mod run;

use anyhow::{Context, Result};
use boostbot_fetch::{BrowserSettings, FetchSettings, build_strategy};
use boostbot_site::{BoostFetcher, SiteDescriptor};
use boostbot_store::SiteConfig;
use tracing::debug;

/// Builds the fetcher for the configured site and strategy.
pub fn build_fetcher(config: &SiteConfig) -> Result<BoostFetcher> {
    let site = SiteDescriptor::animestars()?
        .with_login_url(config.login_url.as_str())?
        .with_target_url(config.target_url.as_str())?;

    let settings = FetchSettings::new(site.site_root())
        .with_strategy(config.strategy)
        .with_timeout(config.request_timeout)
        .with_browser(BrowserSettings {
            headless: config.browser_headless,
            executable: config.chrome_path.clone(),
        });

    let strategy = build_strategy(&settings);
    debug!(strategy = %strategy.display_name(), "Selected session strategy");

    BoostFetcher::new(site, config.credentials.clone(), strategy)
        .context("failed to set up the card fetcher")
}
