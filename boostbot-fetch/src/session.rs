//! Session handles and the transport abstraction behind them.
//!
//! A [`SessionHandle`] is the only mutable shared resource in a fetch: it
//! owns cookies (or a whole browser) and is passed by `&mut` into every
//! request. Dropping it discards the session.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use boostbot_core::StrategyKind;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use url::Url;

use crate::error::FetchError;

// ============================================================================
// Page Response
// ============================================================================

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// HTTP status code of the final response.
    pub status: u16,
    /// Final location after redirects.
    pub url: Url,
    /// Response body (rendered DOM for the browser transport).
    pub body: String,
}

impl PageResponse {
    /// Creates a page response.
    pub fn new(status: u16, url: Url, body: impl Into<String>) -> Self {
        Self {
            status,
            url,
            body: body.into(),
        }
    }

    /// Returns true for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ============================================================================
// Transport
// ============================================================================

/// A live connection to the site that keeps state between requests.
#[async_trait]
pub trait Transport: Send {
    /// Issues a GET-equivalent request.
    async fn fetch(&mut self, url: &str) -> Result<PageResponse, FetchError>;

    /// Submits form fields with a POST-equivalent request.
    async fn submit_form(
        &mut self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<PageResponse, FetchError>;

    /// Returns true if a cookie with this name is held for `url`.
    async fn has_cookie(&mut self, url: &str, name: &str) -> bool;

    /// Releases resources held by the transport.
    async fn close(&mut self) {}
}

// ============================================================================
// Session Handle
// ============================================================================

/// An opaque session opened by a [`crate::SessionStrategy`].
pub struct SessionHandle {
    kind: StrategyKind,
    transport: Box<dyn Transport>,
    timeout: Duration,
    opened_at: DateTime<Utc>,
    requests: u32,
}

impl SessionHandle {
    /// Wraps a transport into a handle. Every request is bounded by
    /// `timeout`.
    pub fn new(kind: StrategyKind, transport: Box<dyn Transport>, timeout: Duration) -> Self {
        Self {
            kind,
            transport,
            timeout,
            opened_at: Utc::now(),
            requests: 0,
        }
    }

    /// The strategy tier this handle was opened with.
    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// When the handle was opened.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Number of requests issued through this handle.
    pub fn request_count(&self) -> u32 {
        self.requests
    }

    /// Fetches a page.
    pub async fn fetch(&mut self, url: &str) -> Result<PageResponse, FetchError> {
        self.requests += 1;
        debug!(url = %url, kind = %self.kind, "Session GET");
        let timeout = self.timeout;
        bounded(timeout, self.transport.fetch(url)).await
    }

    /// Submits a form.
    pub async fn submit_form(
        &mut self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<PageResponse, FetchError> {
        self.requests += 1;
        debug!(url = %url, fields = fields.len(), kind = %self.kind, "Session POST");
        let timeout = self.timeout;
        bounded(timeout, self.transport.submit_form(url, fields)).await
    }

    /// Returns true if the session holds the named cookie for `url`.
    pub async fn has_cookie(&mut self, url: &str, name: &str) -> bool {
        let timeout = self.timeout;
        bounded(timeout, async { Ok(self.transport.has_cookie(url, name).await) })
            .await
            .unwrap_or(false)
    }

    /// Closes the session and releases its transport.
    pub async fn close(mut self) {
        let timeout = self.timeout;
        if tokio::time::timeout(timeout, self.transport.close()).await.is_err() {
            warn!(kind = %self.kind, "Timed out closing session");
        }
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("kind", &self.kind)
            .field("opened_at", &self.opened_at)
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}

/// Runs `fut` with a bounded wait, mapping expiry to `FetchError::Timeout`.
async fn bounded<T>(
    timeout: Duration,
    fut: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout.as_secs())),
    }
}

// ============================================================================
// Tests
// ============================================================================
