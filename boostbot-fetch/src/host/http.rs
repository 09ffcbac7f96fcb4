//! HTTP transport with a cookie jar, tracing, and domain allowlist.
//!
//! This module provides the transport behind the plain and challenge-aware
//! strategies:
//! - Cookies persist across requests (login state lives here)
//! - Redirects are followed; the final URL is reported back
//! - Requests outside the allowlist are refused before going out

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, redirect};
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;
use crate::session::{PageResponse, Transport};

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum redirects followed per request.
const MAX_REDIRECTS: usize = 10;

/// User agent string for the plain transport.
const USER_AGENT: &str = concat!("BoostBot/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Domain Allowlist
// ============================================================================

/// Hosts a transport may contact. An empty list means unrestricted.
#[derive(Debug, Clone, Default)]
pub struct DomainAllowlist {
    domains: Vec<String>,
}

impl DomainAllowlist {
    /// Creates an allowlist; subdomains of each entry are allowed too.
    pub fn new(domains: Vec<String>) -> Self {
        Self { domains }
    }

    /// Checks if a URL's host is allowed.
    pub fn check(&self, url: &str) -> Result<(), FetchError> {
        let parsed = Url::parse(url)?;

        if self.domains.is_empty() {
            return Ok(());
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = self
            .domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(FetchError::DomainNotAllowed(host.to_string()))
        }
    }
}

// ============================================================================
// HTTP Options
// ============================================================================

/// Options for building an [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Client-level request timeout.
    pub timeout: Duration,
    /// User-Agent header.
    pub user_agent: String,
    /// Headers sent with every request.
    pub default_headers: HeaderMap,
    /// Hosts the transport may contact.
    pub allowlist: DomainAllowlist,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            default_headers: HeaderMap::new(),
            allowlist: DomainAllowlist::default(),
        }
    }
}

// ============================================================================
// HTTP Transport
// ============================================================================

/// `reqwest`-backed transport that keeps cookies between calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
    jar: Arc<Jar>,
    allowlist: DomainAllowlist,
}

impl HttpTransport {
    /// Creates a transport with default options.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(HttpOptions::default())
    }

    /// Creates a transport with the given options.
    pub fn with_options(options: HttpOptions) -> Result<Self, FetchError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .default_headers(options.default_headers)
            .cookie_provider(Arc::clone(&jar))
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            inner: client,
            jar,
            allowlist: options.allowlist,
        })
    }

    /// Performs a GET request.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<PageResponse, FetchError> {
        self.allowlist.check(url)?;
        debug!("GET request");

        let response = self.inner.get(url).send().await?;
        debug!(status = %response.status(), final_url = %response.url(), "Response received");
        Self::into_page(response).await
    }

    /// Performs a form-encoded POST request.
    #[instrument(skip(self, fields), fields(url = %url, field_count = fields.len()))]
    pub async fn post_form(
        &self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<PageResponse, FetchError> {
        self.allowlist.check(url)?;
        debug!("POST request with form data");

        let response = self.inner.post(url).form(fields).send().await?;
        debug!(status = %response.status(), final_url = %response.url(), "Response received");
        Self::into_page(response).await
    }

    /// Returns true if the jar holds a cookie with this name for `url`.
    pub fn cookie_present(&self, url: &str, name: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        self.jar
            .cookies(&parsed)
            .and_then(|header| header.to_str().ok().map(str::to_owned))
            .is_some_and(|header| {
                header
                    .split(';')
                    .filter_map(|pair| pair.split_once('='))
                    .any(|(key, _)| key.trim() == name)
            })
    }

    async fn into_page(response: Response) -> Result<PageResponse, FetchError> {
        let status = response.status().as_u16();
        let url = response.url().clone();
        let body = response.text().await?;
        Ok(PageResponse::new(status, url, body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&mut self, url: &str) -> Result<PageResponse, FetchError> {
        self.get(url).await
    }

    async fn submit_form(
        &mut self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<PageResponse, FetchError> {
        self.post_form(url, fields).await
    }

    async fn has_cookie(&mut self, url: &str, name: &str) -> bool {
        self.cookie_present(url, name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowlist() {
        let allowlist = DomainAllowlist::new(vec!["animestars.org".to_string()]);

        assert!(allowlist.check("https://animestars.org/login").is_ok());
        assert!(allowlist.check("https://www.animestars.org/clubs/137/boost/").is_ok());
        assert!(matches!(
            allowlist.check("https://evil.com/steal"),
            Err(FetchError::DomainNotAllowed(_))
        ));
    }

    #[test]
    fn test_no_domain_restrictions() {
        let allowlist = DomainAllowlist::default();
        assert!(allowlist.check("https://any.domain.com").is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let allowlist = DomainAllowlist::new(vec!["example.com".to_string()]);
        assert!(matches!(
            allowlist.check("not-a-valid-url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_cookie_lookup_on_empty_jar() {
        let transport = HttpTransport::new().unwrap();
        assert!(!transport.cookie_present("https://animestars.org/", "cf_clearance"));
        assert!(!transport.cookie_present("garbage", "cf_clearance"));
    }
}
