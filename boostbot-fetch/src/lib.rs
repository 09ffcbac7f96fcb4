// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `BoostBot` Fetch
//!
//! Session strategies and host transports for the `BoostBot` application.
//!
//! A [`SessionStrategy`] opens a [`SessionHandle`]: an authenticated-capable
//! transport that keeps its cookies between calls. Three tiers exist and
//! are interchangeable from the caller's point of view:
//!
//! - [`PlainStrategy`] - direct `reqwest` session with a cookie jar
//! - [`ChallengeStrategy`] - the same session with browser-fingerprint
//!   headers and a warm-up request that waits out interstitial checks
//! - [`BrowserStrategy`] - a headless Chrome driven over CDP
//!
//! ## Host APIs
//!
//! - [`host::http`] - cookie-keeping HTTP transport with a domain allowlist
//! - [`host::challenge`] - fingerprint headers and challenge detection
//! - [`host::browser`] - browser-backed transport
//!
//! ## Example
//!
//! ```ignore
//! use boostbot_fetch::{FetchSettings, build_strategy};
//!
//! let settings = FetchSettings::new("https://animestars.org/".parse()?);
//! let strategy = build_strategy(&settings);
//!
//! let mut handle = strategy.open().await?;
//! let page = handle.fetch("https://animestars.org/login").await?;
//! handle.close().await;
//! ```

pub mod context;
pub mod error;
pub mod host;
pub mod retry;
pub mod session;
pub mod strategies;
pub mod strategy;

// Errors
pub use error::FetchError;

// Host APIs
pub use host::{
    browser::BrowserTransport,
    http::{DomainAllowlist, HttpOptions, HttpTransport},
};

// Strategy & Session
pub use context::{BrowserSettings, ChallengeSettings, FetchSettings};
pub use retry::BackoffPolicy;
pub use session::{PageResponse, SessionHandle, Transport};
pub use strategies::{BrowserStrategy, ChallengeStrategy, PlainStrategy};
pub use strategy::{SessionStrategy, StrategyInfo, build_strategy};

pub use boostbot_core::StrategyKind;
