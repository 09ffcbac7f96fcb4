//! Minimal Telegram Bot API client.
//!
//! Only the four calls the bot needs: `getUpdates`, `sendMessage`,
//! `setWebhook` and `deleteWebhook`. The token is part of every request
//! URL, so errors are stripped of their URL before they can be logged.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};

/// Extra time on top of the long-poll timeout before the client gives up.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Timeout for ordinary calls.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Errors
// ============================================================================

/// Telegram client errors.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The API answered with `ok: false`.
    #[error("Telegram API error {code}: {description}")]
    Api {
        /// Error code reported by the API.
        code: i64,
        /// Description reported by the API.
        description: String,
    },
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::Http(err.without_url())
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// An incoming update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Update {
    /// Monotonic update id.
    pub update_id: i64,
    /// New message, if this update carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Message id within the chat.
    pub message_id: i64,
    /// Chat the message belongs to.
    pub chat: Chat,
    /// Message text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    /// Chat id.
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// Bot API client bound to one token.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl TelegramClient {
    /// Creates a client for `token` against `api_url`.
    pub fn new(api_url: &str, token: &str) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        })
    }

    /// Long-polls for updates after `offset`.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut body = json!({ "timeout": timeout.as_secs(), "allowed_updates": ["message"] });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }
        self.call("getUpdates", &body, timeout + POLL_GRACE).await
    }

    /// Sends a plain text message.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let body = json!({ "chat_id": chat_id, "text": text });
        let _: Message = self.call("sendMessage", &body, CALL_TIMEOUT).await?;
        Ok(())
    }

    /// Registers `url` as the webhook.
    pub async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        let _: bool = self
            .call("setWebhook", &json!({ "url": url }), CALL_TIMEOUT)
            .await?;
        Ok(())
    }

    /// Removes any registered webhook so long-polling works.
    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let _: bool = self.call("deleteWebhook", &json!({}), CALL_TIMEOUT).await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<T, TelegramError> {
        debug!(method, "Bot API call");
        let response: ApiResponse<T> = self
            .http
            .post(format!("{}/{method}", self.base))
            .timeout(timeout)
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            other => Err(TelegramError::Api {
                code: other.error_code.unwrap_or_default(),
                description: other
                    .description
                    .unwrap_or_else(|| format!("{method} returned no result")),
            }),
        }
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
