//! Browser fingerprint headers and interstitial challenge detection.
//!
//! The challenge-aware strategy presents itself as a desktop Chrome and
//! waits out lightweight bot checks that answer the first requests with
//! a 403/429/503 interstitial page.

use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue,
    UPGRADE_INSECURE_REQUESTS,
};

/// Desktop Chrome user agent used by the challenge-aware and browser tiers.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Cookie set once a clearance check has been passed. Informational only.
pub const CLEARANCE_COOKIE: &str = "cf_clearance";

/// Status codes an interstitial is served with.
const CHALLENGE_STATUSES: &[u16] = &[403, 429, 503];

/// Body markers of known interstitial pages.
const CHALLENGE_MARKERS: &[&str] = &[
    "cf-browser-verification",
    "challenge-platform",
    "cf_chl_opt",
    "cf-challenge",
    "Just a moment...",
    "Checking your browser",
    "DDoS-Guard",
];

/// Headers a desktop Chrome sends on a top-level navigation.
pub fn fingerprint_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    let client_hints: [(&'static str, &'static str); 7] = [
        (
            "sec-ch-ua",
            "\"Chromium\";v=\"124\", \"Google Chrome\";v=\"124\", \"Not-A.Brand\";v=\"99\"",
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"Windows\""),
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
    ];
    for (name, value) in client_hints {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    headers
}

/// Returns true if a response looks like an anti-automation interstitial
/// rather than real content.
pub fn looks_like_challenge(status: u16, body: &str) -> bool {
    CHALLENGE_STATUSES.contains(&status)
        && CHALLENGE_MARKERS.iter().any(|marker| body.contains(marker))
}
