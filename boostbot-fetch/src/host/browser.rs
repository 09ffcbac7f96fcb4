//! Headless Chrome transport for sites that need script execution.
//!
//! Each transport owns one browser process and one page. Navigation goes
//! through the page so challenge scripts run; form submission builds a
//! real `<form>` in the page and submits it, so the browser carries
//! cookies and redirects exactly as a user session would.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::EventFrameStartedLoading;
use chromiumoxide::handler::http::HttpRequest;
use chromiumoxide::page::Page;
use futures::stream::BoxStream;
use futures::{StreamExt, future};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::FetchError;
use crate::host::challenge::CHROME_USER_AGENT;
use crate::host::http::DomainAllowlist;
use crate::session::{PageResponse, Transport};

// ============================================================================
// Browser Transport
// ============================================================================

/// Transport backed by a headless Chrome page.
pub struct BrowserTransport {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    allowlist: DomainAllowlist,
}

impl BrowserTransport {
    /// Launches a browser and opens a blank page.
    #[instrument(skip(allowlist))]
    pub async fn launch(
        headless: bool,
        executable: Option<PathBuf>,
        request_timeout: Duration,
        allowlist: DomainAllowlist,
    ) -> Result<Self, FetchError> {
        info!(headless, "Launching browser");

        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox") // Required for containerized environments
            .arg("--disable-dev-shm-usage") // Avoid /dev/shm size issues in containers
            .arg(format!("--user-agent={CHROME_USER_AGENT}"))
            .request_timeout(request_timeout);
        if !headless {
            builder = builder.with_head();
        }
        if let Some(path) = executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| FetchError::Browser(format!("Failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            handler,
            allowlist,
        })
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Page operations the transport drives. Implemented for the Chrome page
/// and by scripted pages in tests.
#[async_trait]
trait NavigablePage: Send + Sync {
    /// Loads `url` and waits until the page has finished loading.
    async fn load(&self, url: &str) -> Result<(), FetchError>;

    /// Stream yielding once per main-frame load start seen after the call.
    async fn load_starts(&self) -> Result<BoxStream<'static, ()>, FetchError>;

    /// Evaluates `script` in the current document.
    async fn run_script(&self, script: String) -> Result<(), FetchError>;

    /// Waits for the current navigation to finish and reads the page.
    async fn settled(&self, requested: &str) -> Result<PageResponse, FetchError>;
}

#[async_trait]
impl NavigablePage for Page {
    async fn load(&self, url: &str) -> Result<(), FetchError> {
        self.goto(url).await?;
        Ok(())
    }

    async fn load_starts(&self) -> Result<BoxStream<'static, ()>, FetchError> {
        let main_frame = self.mainframe().await?;
        let starts = self.event_listener::<EventFrameStartedLoading>().await?;
        Ok(starts
            .filter(move |event| {
                future::ready(main_frame.as_ref().is_none_or(|id| *id == event.frame_id))
            })
            .map(|_| ())
            .boxed())
    }

    async fn run_script(&self, script: String) -> Result<(), FetchError> {
        self.evaluate(script).await?;
        Ok(())
    }

    async fn settled(&self, requested: &str) -> Result<PageResponse, FetchError> {
        let request = self.wait_for_navigation_response().await?;
        let status = document_status(request.as_deref())?;
        let location = self.url().await?.unwrap_or_else(|| requested.to_string());
        let body = self.content().await?;
        debug!(location = %location, status, bytes = body.len(), "Page rendered");
        Ok(PageResponse::new(status, Url::parse(&location)?, body))
    }
}

/// Navigates to `url` and reads the loaded page.
async fn navigate<P: NavigablePage + ?Sized>(
    page: &P,
    url: &str,
) -> Result<PageResponse, FetchError> {
    page.load(url).await?;
    page.settled(url).await
}

/// Runs a navigating `script` and reads the page it leads to.
///
/// The load-start subscription is taken before the script runs; reading
/// earlier would return the document the script was evaluated in.
async fn submit<P: NavigablePage + ?Sized>(
    page: &P,
    script: String,
    requested: &str,
) -> Result<PageResponse, FetchError> {
    let mut starts = page.load_starts().await?;

    // The page unloads mid-evaluation, which CDP may report as an error.
    if let Err(e) = page.run_script(script).await {
        debug!(error = %e, "Form submit evaluation ended with navigation");
    }

    if starts.next().await.is_none() {
        return Err(FetchError::Browser(
            "page closed before the form submission navigated".to_string(),
        ));
    }
    page.settled(requested).await
}

/// Status of the main document request behind the current page.
fn document_status(request: Option<&HttpRequest>) -> Result<u16, FetchError> {
    let request = request.ok_or_else(|| {
        FetchError::Browser("navigation finished without a document request".to_string())
    })?;
    if let Some(reason) = &request.failure_text {
        return Err(FetchError::Browser(format!("navigation failed: {reason}")));
    }
    response_status(request.response.as_ref().map(|response| response.status))
}

fn response_status(status: Option<i64>) -> Result<u16, FetchError> {
    let status = status.ok_or_else(|| {
        FetchError::Browser("document request has no response".to_string())
    })?;
    u16::try_from(status)
        .ok()
        .filter(|code| (100..=599).contains(code))
        .ok_or_else(|| FetchError::Browser(format!("invalid response status {status}")))
}

/// Script that posts `fields` to `action` through a generated form.
fn form_submit_script(action: &str, fields: &[(String, String)]) -> Result<String, FetchError> {
    let action = serde_json::to_string(action)
        .map_err(|e| FetchError::Browser(format!("Failed to encode form action: {e}")))?;
    let fields = serde_json::to_string(fields)
        .map_err(|e| FetchError::Browser(format!("Failed to encode form fields: {e}")))?;

    Ok(format!(
        r"(() => {{
    const form = document.createElement('form');
    form.method = 'POST';
    form.action = {action};
    for (const [name, value] of {fields}) {{
        const input = document.createElement('input');
        input.type = 'hidden';
        input.name = name;
        input.value = value;
        form.appendChild(input);
    }}
    document.body.appendChild(form);
    form.submit();
    return true;
}})()"
    ))
}

#[async_trait]
impl Transport for BrowserTransport {
    async fn fetch(&mut self, url: &str) -> Result<PageResponse, FetchError> {
        self.allowlist.check(url)?;
        navigate(&self.page, url).await
    }

    async fn submit_form(
        &mut self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<PageResponse, FetchError> {
        self.allowlist.check(url)?;
        let script = form_submit_script(url, fields)?;
        submit(&self.page, script, url).await
    }

    async fn has_cookie(&mut self, _url: &str, name: &str) -> bool {
        match self.page.get_cookies().await {
            Ok(cookies) => cookies.iter().any(|cookie| cookie.name == name),
            Err(e) => {
                warn!(error = %e, "Failed to read browser cookies");
                false
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Failed to close browser");
        }
        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "Browser process wait failed");
        }
        self.handler.abort();
        debug!("Browser closed");
    }
}

// ============================================================================
// Tests
// ============================================================================
