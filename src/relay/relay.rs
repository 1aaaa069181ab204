use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::command;
use crate::dispatch::dispatch;
use crate::error::RelayError;
use crate::publisher::ReplyPublisher;
use crate::secrets::{SecretProvider, ACCESS_TOKEN_KEY, APP_SECRET_KEY};
use crate::signature;
use crate::support::SupportApi;
use crate::types::{InboundRequest, ReplyMessage, WebhookTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Signature or timestamp check failed; nothing was sent.
    Rejected,
    Delivered(ReplyMessage),
    /// The reply was built but the webhook POST failed.
    PublishFailed(ReplyMessage),
}

/// One robot callback end to end: verify, parse, dispatch, publish.
pub struct Relay {
    secrets: Arc<dyn SecretProvider>,
    support: Arc<dyn SupportApi>,
    publisher: Arc<dyn ReplyPublisher>,
}

impl Relay {
    pub fn new(
        secrets: Arc<dyn SecretProvider>,
        support: Arc<dyn SupportApi>,
        publisher: Arc<dyn ReplyPublisher>,
    ) -> Self {
        Self {
            secrets,
            support,
            publisher,
        }
    }

    pub async fn handle(
        &self,
        request: &InboundRequest,
        now: DateTime<Utc>,
    ) -> Result<Outcome, RelayError> {
        let app_secret = self.secrets.get_secret(APP_SECRET_KEY).await?;

        if !signature::verify(&request.timestamp, &request.signature, &app_secret, now) {
            warn!("Dropping request without a valid robot signature");
            return Ok(Outcome::Rejected);
        }
        info!("Robot signature verified");

        // Resolve the outbound target before any Support API side effect.
        // The URL is signed over a fresh timestamp, not the inbound one.
        let timestamp = signature::timestamp_millis(now);
        let target = WebhookTarget {
            access_token: self.secrets.get_secret(ACCESS_TOKEN_KEY).await?,
            sign: signature::sign(&timestamp, &app_secret)?,
            timestamp,
        };

        let command = command::parse(&request.message_text);
        let reply = dispatch(&command, self.support.as_ref()).await;

        match self.publisher.publish(&reply, &target).await {
            Ok(()) => {
                info!(command = command.kind(), "Reply delivered");
                Ok(Outcome::Delivered(reply))
            }
            Err(e) => {
                warn!(command = command.kind(), "Failed to deliver reply: {}", e);
                Ok(Outcome::PublishFailed(reply))
            }
        }
    }
}
