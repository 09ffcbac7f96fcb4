//! Long-poll delivery.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use boostbot_core::SnapshotSource;
use tracing::{debug, info, warn};

use super::{BotContext, spawn_update};

/// Pause after a failed poll.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Polls for updates until `shutdown` resolves.
pub async fn run<S, F>(ctx: Arc<BotContext<S>>, poll_timeout: Duration, shutdown: F) -> Result<()>
where
    S: SnapshotSource,
    F: Future<Output = ()>,
{
    if let Err(e) = ctx.client.delete_webhook().await {
        warn!(error = %e, "Could not remove webhook; polling may be refused");
    }
    info!(timeout_secs = poll_timeout.as_secs(), "Polling for updates");

    tokio::pin!(shutdown);
    let mut offset: Option<i64> = None;

    loop {
        let polled = tokio::select! {
            () = &mut shutdown => return Ok(()),
            result = ctx.client.get_updates(offset, poll_timeout) => result,
        };

        match polled {
            Ok(updates) => {
                debug!(count = updates.len(), "Poll returned");
                for update in updates {
                    offset = Some(update.update_id + 1);
                    spawn_update(Arc::clone(&ctx), update);
                }
            }
            Err(e) => {
                warn!(error = %e, delay_secs = RETRY_DELAY.as_secs(), "Poll failed");
                tokio::select! {
                    () = &mut shutdown => return Ok(()),
                    () = tokio::time::sleep(RETRY_DELAY) => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::delivery::test_support::{context, wait_for_request};

    #[tokio::test]
    async fn test_polls_and_answers() {
        let api = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/deleteWebhook"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })),
            )
            .expect(1)
            .mount(&api)
            .await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [
                    { "update_id": 10, "message": { "message_id": 1, "chat": { "id": 3 }, "text": "/start" } }
                ]
            })))
            .up_to_n_times(1)
            .mount(&api)
            .await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/getUpdates"))
            .and(body_partial_json(json!({ "offset": 11 })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "ok": true, "result": [] }))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&api)
            .await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "message_id": 2, "chat": { "id": 3 } }
            })))
            .mount(&api)
            .await;

        let poller = tokio::spawn(run(
            context(&api),
            Duration::from_secs(1),
            std::future::pending(),
        ));

        let sent = wait_for_request(&api, "/bot123:abc/sendMessage").await;
        assert_eq!(sent["chat_id"], 3);
        assert_eq!(sent["text"], crate::dispatcher::GREETING);

        poller.abort();
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_retry_delay() {
        let api = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/deleteWebhook"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })),
            )
            .mount(&api)
            .await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/getUpdates"))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!({
                "ok": false,
                "error_code": 502,
                "description": "Bad Gateway"
            })))
            .expect(1)
            .mount(&api)
            .await;

        let shutdown = tokio::time::sleep(Duration::from_millis(300));
        let stopped = tokio::time::timeout(
            Duration::from_secs(2),
            run(context(&api), Duration::from_secs(1), shutdown),
        )
        .await;

        assert!(matches!(stopped, Ok(Ok(()))), "poller kept sleeping after shutdown");
    }
}
