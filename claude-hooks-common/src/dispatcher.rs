//! Webhook delivery.
//!
//! One POST per invocation. Failures are reported, never retried; the host
//! tool decides whether to fire the hook again.

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::config::WebhookTarget;
use crate::error::{DeliveryError, HooksResult};
use crate::message::NotificationMessage;

/// User agent sent with every delivery.
pub const USER_AGENT: &str = concat!("claude-hooks/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error response body kept for diagnostics.
const MAX_ERROR_BODY: usize = 512;

/// Sends rendered notifications to a single webhook target.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    client: Client,
    target: WebhookTarget,
}

impl NotificationDispatcher {
    /// Build a dispatcher for `target`.
    pub fn new(target: WebhookTarget) -> HooksResult<Self> {
        let client = Client::builder()
            .timeout(target.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(DeliveryError::Transport)?;
        Ok(Self { client, target })
    }

    pub fn target(&self) -> &WebhookTarget {
        &self.target
    }

    /// Make one delivery attempt.
    #[instrument(skip_all, fields(event = %message.event, severity = %message.severity))]
    pub async fn deliver(&self, message: &NotificationMessage) -> HooksResult<()> {
        let mut request = self
            .client
            .post(self.target.url.clone())
            .json(&message.to_payload());
        if let Some(token) = &self.target.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        debug!(host = self.target.url.host_str().unwrap_or(""), "Posting notification");
        let response = request.send().await.map_err(DeliveryError::Transport)?;
        check_response(response).await?;

        info!("Notification delivered");
        Ok(())
    }
}

/// Map a non-success response to [`DeliveryError::Status`].
async fn check_response(response: reqwest::Response) -> Result<(), DeliveryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }

    Err(DeliveryError::Status {
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::HookContext;
    use crate::error::HooksError;
    use crate::event::HookEvent;
    use chrono::Utc;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target_for(server: &MockServer) -> WebhookTarget {
        let url = Url::parse(&format!("{}/services/T/B/X", server.uri())).unwrap();
        WebhookTarget::new(url)
    }

    fn stop_message(target: &WebhookTarget) -> NotificationMessage {
        let ctx = HookContext::new("/tmp/project", Utc::now());
        NotificationMessage::render(&HookEvent::Stop.template(), &ctx, target, None)
    }

    #[tokio::test]
    async fn test_deliver_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/T/B/X"))
            .and(header("content-type", "application/json"))
            .and(header("user-agent", USER_AGENT))
            .and(body_partial_json(serde_json::json!({
                "blocks": [{"type": "header", "text": {"text": "⏹️ Claude Code Stopped"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let target = target_for(&server);
        let dispatcher = NotificationDispatcher::new(target.clone()).unwrap();

        dispatcher.deliver(&stop_message(&target)).await.unwrap();
    }

    #[tokio::test]
    async fn test_deliver_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut target = target_for(&server);
        target.token = Some("s3cret".to_string());
        let dispatcher = NotificationDispatcher::new(target.clone()).unwrap();

        dispatcher.deliver(&stop_message(&target)).await.unwrap();
    }

    #[tokio::test]
    async fn test_deliver_server_error_is_delivery_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("invalid_payload"))
            .expect(1)
            .mount(&server)
            .await;

        let target = target_for(&server);
        let dispatcher = NotificationDispatcher::new(target.clone()).unwrap();

        let err = dispatcher.deliver(&stop_message(&target)).await.unwrap_err();
        match err {
            HooksError::Delivery(DeliveryError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "invalid_payload");
            }
            other => panic!("expected status failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deliver_does_not_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let target = target_for(&server);
        let dispatcher = NotificationDispatcher::new(target.clone()).unwrap();

        assert!(dispatcher.deliver(&stop_message(&target)).await.is_err());
        // MockServer verifies the single expected call on drop.
    }

    #[tokio::test]
    async fn test_deliver_unreachable_is_transport_failure() {
        // Bind and release a port so nothing is listening on it.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let target = WebhookTarget::new(Url::parse(&format!("http://127.0.0.1:{port}/hook")).unwrap());

        let dispatcher = NotificationDispatcher::new(target.clone()).unwrap();
        let err = dispatcher.deliver(&stop_message(&target)).await.unwrap_err();

        assert!(matches!(
            err,
            HooksError::Delivery(DeliveryError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_deliver_timeout_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let mut target = target_for(&server);
        target.timeout = Duration::from_millis(200);
        let dispatcher = NotificationDispatcher::new(target.clone()).unwrap();

        let err = dispatcher.deliver(&stop_message(&target)).await.unwrap_err();
        assert!(err.is_delivery_failure());
    }

    #[tokio::test]
    async fn test_long_error_body_is_truncated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("é".repeat(1000)))
            .mount(&server)
            .await;

        let target = target_for(&server);
        let dispatcher = NotificationDispatcher::new(target.clone()).unwrap();

        match dispatcher.deliver(&stop_message(&target)).await.unwrap_err() {
            HooksError::Delivery(DeliveryError::Status { body, .. }) => {
                assert!(body.len() <= MAX_ERROR_BODY);
            }
            other => panic!("expected status failure, got {other:?}"),
        }
    }
}
