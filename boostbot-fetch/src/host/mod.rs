//! Host APIs for `BoostBot` session strategies.
//!
//! - [`http`] - Cookie-keeping HTTP transport with a domain allowlist
//! - [`challenge`] - Browser-fingerprint headers and interstitial detection
//! - [`browser`] - Headless Chrome transport

pub mod browser;
pub mod challenge;
pub mod http;

// Re-export key types
pub use browser::BrowserTransport;
pub use http::{DomainAllowlist, HttpOptions, HttpTransport};
