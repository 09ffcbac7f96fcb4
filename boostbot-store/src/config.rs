//! Environment configuration.
//!
//! All settings come from environment variables (optionally seeded from a
//! `.env` file by the binary). Parsing goes through a lookup function so
//! it can be exercised without touching the process environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use boostbot_core::{Credentials, StrategyKind};
use boostbot_site::{DEFAULT_LOGIN_URL, DEFAULT_TARGET_URL};
use tracing::debug;
use url::Url;

use crate::error::StoreError;

/// Default chat platform API root.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

const DEFAULT_PORT: u16 = 8443;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_COOLDOWN_SECS: u64 = 30;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Delivery Mode
// ============================================================================

/// How updates reach the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    /// The chat platform posts updates to our webhook.
    Push {
        /// Listening port.
        port: u16,
        /// Public base URL the platform posts to.
        webhook_url: Url,
    },
    /// We long-poll the chat platform.
    Pull {
        /// Long-poll timeout per request.
        poll_timeout: Duration,
    },
}

impl DeliveryMode {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            DeliveryMode::Push { .. } => "push",
            DeliveryMode::Pull { .. } => "pull",
        }
    }
}

// ============================================================================
// Site Config
// ============================================================================

/// Everything needed to log in and read the card.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Site login.
    pub credentials: Credentials,
    /// Session strategy tier.
    pub strategy: StrategyKind,
    /// Login endpoint.
    pub login_url: Url,
    /// Target page.
    pub target_url: Url,
    /// Bounded wait for each network step.
    pub request_timeout: Duration,
    /// Browser strategy: run headless.
    pub browser_headless: bool,
    /// Browser strategy: explicit executable.
    pub chrome_path: Option<PathBuf>,
}

impl SiteConfig {
    /// Reads site settings from the process environment.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads site settings through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let strategy = match env.get("FETCH_STRATEGY") {
            Some(name) => name
                .parse::<StrategyKind>()
                .map_err(|e| StoreError::invalid("FETCH_STRATEGY", e))?,
            None => StrategyKind::default(),
        };

        let config = Self {
            credentials: Credentials::new(env.require("USERNAME")?, env.require("PASSWORD")?),
            strategy,
            login_url: env.url("LOGIN_URL", DEFAULT_LOGIN_URL)?,
            target_url: env.url("TARGET_URL", DEFAULT_TARGET_URL)?,
            request_timeout: Duration::from_secs(
                env.parse_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            ),
            browser_headless: env.flag("BROWSER_HEADLESS", true)?,
            chrome_path: env.get("CHROME_PATH").map(PathBuf::from),
        };

        if config.request_timeout.is_zero() {
            return Err(StoreError::invalid("REQUEST_TIMEOUT_SECS", "must be positive"));
        }

        Ok(config)
    }
}

// ============================================================================
// Bot Config
// ============================================================================

/// Complete process configuration.
#[derive(Clone)]
pub struct BotConfig {
    /// Bot token.
    pub token: String,
    /// Update delivery.
    pub delivery: DeliveryMode,
    /// Window in which a finished snapshot is served again. Zero disables
    /// reuse.
    pub cache_cooldown: Duration,
    /// Chat platform API root.
    pub telegram_api_url: Url,
    /// Site access.
    pub site: SiteConfig,
}

impl BotConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);
        let token = env.require("TOKEN")?;
        let site = SiteConfig::from_lookup(&lookup)?;

        let delivery = match env.get("DELIVERY_MODE").as_deref().unwrap_or("push") {
            "push" | "webhook" => DeliveryMode::Push {
                port: env.parse_or("PORT", DEFAULT_PORT)?,
                webhook_url: env.url("WEBHOOK_URL", "")?,
            },
            "pull" | "polling" => DeliveryMode::Pull {
                poll_timeout: Duration::from_secs(
                    env.parse_or("POLL_TIMEOUT_SECS", DEFAULT_POLL_TIMEOUT_SECS)?,
                ),
            },
            other => {
                return Err(StoreError::invalid(
                    "DELIVERY_MODE",
                    format!("'{other}' (expected push or pull)"),
                ));
            }
        };

        let config = Self {
            token,
            delivery,
            cache_cooldown: Duration::from_secs(
                env.parse_or("CACHE_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS)?,
            ),
            telegram_api_url: env.url("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL)?,
            site,
        };

        debug!(
            delivery = config.delivery.name(),
            strategy = %config.site.strategy,
            cooldown_secs = config.cache_cooldown.as_secs(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Full webhook URL registered with the chat platform.
    pub fn webhook_endpoint(&self) -> Option<String> {
        match &self.delivery {
            DeliveryMode::Push { webhook_url, .. } => Some(format!(
                "{}/{}",
                webhook_url.as_str().trim_end_matches('/'),
                self.token
            )),
            DeliveryMode::Pull { .. } => None,
        }
    }

    /// Token with everything but the bot id masked, for logs.
    pub fn redacted_token(&self) -> String {
        redact_token(&self.token)
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &self.redacted_token())
            .field("delivery", &self.delivery)
            .field("cache_cooldown", &self.cache_cooldown)
            .field("telegram_api_url", &self.telegram_api_url.as_str())
            .field("site", &self.site)
            .finish()
    }
}

/// Masks a bot token, keeping the numeric bot id prefix if present.
pub fn redact_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, _)) => format!("{id}:***"),
        None => "***".to_string(),
    }
}

/// Lookup wrapper that treats blank values as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn require(&self, key: &'static str) -> Result<String, StoreError> {
        self.get(key).ok_or_else(|| StoreError::missing(key))
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, StoreError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw.parse().map_err(|e| StoreError::invalid(key, e)),
            None => Ok(default),
        }
    }

    fn flag(&self, key: &'static str, default: bool) -> Result<bool, StoreError> {
        match self.get(key).map(|raw| raw.to_ascii_lowercase()).as_deref() {
            None => Ok(default),
            Some("1" | "true" | "yes" | "on") => Ok(true),
            Some("0" | "false" | "no" | "off") => Ok(false),
            Some(other) => Err(StoreError::invalid(key, format!("'{other}' is not a boolean"))),
        }
    }

    /// Parses a URL key. An empty `default` makes the key required.
    fn url(&self, key: &'static str, default: &str) -> Result<Url, StoreError> {
        let raw = match self.get(key) {
            Some(raw) => raw,
            None if default.is_empty() => return Err(StoreError::missing(key)),
            None => default.to_string(),
        };
        Url::parse(&raw).map_err(|e| StoreError::invalid(key, e))
    }
}

// ============================================================================
// Tests
// ============================================================================
