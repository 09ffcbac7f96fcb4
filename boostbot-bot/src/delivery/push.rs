//! Webhook delivery.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use boostbot_core::SnapshotSource;
use boostbot_store::redact_token;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use super::{BotContext, shutdown_signal, spawn_update};
use crate::telegram::Update;

/// Router state.
struct WebhookState<S: SnapshotSource> {
    ctx: Arc<BotContext<S>>,
    token: Arc<str>,
}

impl<S: SnapshotSource> Clone for WebhookState<S> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
            token: Arc::clone(&self.token),
        }
    }
}

/// Builds the webhook router: `POST /{token}` and `GET /health`.
pub fn router<S: SnapshotSource>(ctx: Arc<BotContext<S>>, token: &str) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/{secret}", post(handle_update::<S>))
        .with_state(WebhookState {
            ctx,
            token: Arc::from(token),
        })
}

/// Registers the webhook and serves it until shutdown.
pub async fn serve<S: SnapshotSource>(
    ctx: Arc<BotContext<S>>,
    port: u16,
    token: &str,
    endpoint: &str,
) -> Result<()> {
    let shown = endpoint.replace(token, &redact_token(token));

    ctx.client
        .set_webhook(endpoint)
        .await
        .with_context(|| format!("failed to register webhook at {shown}"))?;
    info!(url = %shown, "Webhook registered");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "Webhook server listening");

    axum::serve(listener, router(ctx, token))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server failed")
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Webhook endpoint. Answers immediately; processing runs on its own task.
async fn handle_update<S: SnapshotSource>(
    State(state): State<WebhookState<S>>,
    Path(secret): Path<String>,
    Json(update): Json<Update>,
) -> impl IntoResponse {
    if secret != *state.token {
        warn!("Webhook call with wrong path");
        return (StatusCode::NOT_FOUND, "Not Found");
    }

    debug!(update_id = update.update_id, "Update received");
    spawn_update(Arc::clone(&state.ctx), update);
    (StatusCode::OK, "OK")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::delivery::test_support::{TOKEN, context, wait_for_request};

    async fn start(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    async fn mock_send_message(api: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "message_id": 2, "chat": { "id": 7 } }
            })))
            .mount(api)
            .await;
    }

    #[tokio::test]
    async fn test_webhook_update_is_answered() {
        let api = MockServer::start().await;
        mock_send_message(&api).await;
        let addr = start(router(context(&api), TOKEN)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/{TOKEN}"))
            .json(&json!({
                "update_id": 1,
                "message": { "message_id": 5, "chat": { "id": 7 }, "text": "/card" }
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let sent = wait_for_request(&api, "/bot123:abc/sendMessage").await;
        assert_eq!(sent["chat_id"], 7);
        assert_eq!(sent["text"], "Текущая карта: Sakura Card\nВладельцы:\nUserA");
    }

    #[tokio::test]
    async fn test_wrong_path_is_rejected() {
        let api = MockServer::start().await;
        let addr = start(router(context(&api), TOKEN)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/not-the-token"))
            .json(&json!({ "update_id": 1 }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_health() {
        let api = MockServer::start().await;
        let addr = start(router(context(&api), TOKEN)).await;

        let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "OK");
    }
}
