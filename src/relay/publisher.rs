use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use thiserror::Error;
use tracing::info;

use crate::types::{ReplyMessage, TextMessage, WebhookResponse, WebhookTarget};

pub const DEFAULT_WEBHOOK_URL: &str = "https://oapi.dingtalk.com/robot/send";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to encode webhook query: {0}")]
    Query(String),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("robot rejected message (errcode {code}): {message}")]
    Rejected { code: i64, message: String },
}

/// Delivers a reply into the chat channel.
#[async_trait]
pub trait ReplyPublisher: Send + Sync {
    async fn publish(&self, reply: &ReplyMessage, target: &WebhookTarget) -> Result<(), PublishError>;
}

pub struct WebhookPublisher {
    client: Client,
    webhook_url: Url,
}

impl WebhookPublisher {
    pub fn new(webhook_url: Url) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }

    /// The robot send URL with token, timestamp and signature in the query.
    /// Pairs already present in the configured URL are kept.
    pub fn webhook_url(&self, target: &WebhookTarget) -> Result<Url, PublishError> {
        let query = serde_urlencoded::to_string(target)
            .map_err(|e| PublishError::Query(e.to_string()))?;
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(&query)
            .map_err(|e| PublishError::Query(e.to_string()))?;
        let mut url = self.webhook_url.clone();
        url.query_pairs_mut().extend_pairs(pairs);
        Ok(url)
    }
}

#[async_trait]
impl ReplyPublisher for WebhookPublisher {
    async fn publish(&self, reply: &ReplyMessage, target: &WebhookTarget) -> Result<(), PublishError> {
        let url = self.webhook_url(target)?;
        let body = serde_json::to_vec(&TextMessage::from(reply))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        info!(status = status.as_u16(), body = %text, "Robot webhook responded");

        if !status.is_success() {
            return Err(PublishError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        // Only an explicit non-zero errcode counts as a rejection.
        if let Ok(ack) = serde_json::from_str::<WebhookResponse>(&text) {
            if ack.errcode != 0 {
                return Err(PublishError::Rejected {
                    code: ack.errcode,
                    message: ack.errmsg,
                });
            }
        }

        Ok(())
    }
}
