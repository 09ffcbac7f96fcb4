// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `BoostBot` Site
//!
//! Site-specific logic for the `BoostBot` application.
//!
//! - **Descriptor**: endpoints, form field names, card selectors
//! - **Form**: login form discovery and payload assembly
//! - **Auth**: the login handshake and its verification
//! - **Parser / Extract**: reading the boosted card from the target page
//! - **Fetcher**: the authenticator and extractor paired over one session
//!
//! ## Usage
//!
//! ```ignore
//! use boostbot_fetch::{FetchSettings, build_strategy};
//! use boostbot_site::{BoostFetcher, SiteDescriptor};
//!
//! let site = SiteDescriptor::animestars()?;
//! let strategy = build_strategy(&FetchSettings::new(site.site_root()));
//! let mut fetcher = BoostFetcher::new(site, credentials, strategy)?;
//!
//! let snapshot = fetcher.fetch().await;
//! println!("{}: {:?}", snapshot.card_name(), snapshot.owners());
//! ```

pub mod auth;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod form;
pub mod parser;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use auth::{AuthState, Authenticator};
pub use descriptor::{
    CardSelectors, DEFAULT_LOGIN_URL, DEFAULT_TARGET_URL, SelectorChain, SiteDescriptor,
};
pub use error::{AuthError, SiteError};
pub use extract::CardExtractor;
pub use fetcher::BoostFetcher;
pub use form::LoginFormState;
pub use parser::CardParser;
