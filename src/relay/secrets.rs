use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use thiserror::Error;

pub const APP_SECRET_KEY: &str = "app_secret";
pub const ACCESS_TOKEN_KEY: &str = "access_token";

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secrets manager request failed: {0}")]
    Upstream(String),

    #[error("secret {0} has no value")]
    Empty(String),

    #[error("secret payload is not a JSON object: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("key {0} not present in secret")]
    MissingKey(String),

    #[error("key {0} in secret is not a string")]
    NotAString(String),
}

/// Source of named secret values. Implementations return values with
/// surrounding whitespace removed.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get_secret(&self, key: &str) -> Result<String, SecretError>;
}

/// Reads keys out of a single JSON secret stored in AWS Secrets Manager.
pub struct SecretsManagerProvider {
    client: aws_sdk_secretsmanager::Client,
    secret_id: String,
}

impl SecretsManagerProvider {
    pub fn new(client: aws_sdk_secretsmanager::Client, secret_id: String) -> Self {
        Self { client, secret_id }
    }
}

#[async_trait]
impl SecretProvider for SecretsManagerProvider {
    async fn get_secret(&self, key: &str) -> Result<String, SecretError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await
            .map_err(|e| SecretError::Upstream(DisplayErrorContext(&e).to_string()))?;

        let payload = match (output.secret_string(), output.secret_binary()) {
            (Some(text), _) => text.to_string(),
            (None, Some(blob)) => String::from_utf8_lossy(blob.as_ref()).into_owned(),
            (None, None) => return Err(SecretError::Empty(self.secret_id.clone())),
        };

        lookup(&payload, key)
    }
}

fn lookup(payload: &str, key: &str) -> Result<String, SecretError> {
    let values: serde_json::Map<String, serde_json::Value> = serde_json::from_str(payload)?;
    let value = values
        .get(key)
        .ok_or_else(|| SecretError::MissingKey(key.to_string()))?;
    value
        .as_str()
        .map(|value| value.trim().to_string())
        .ok_or_else(|| SecretError::NotAString(key.to_string()))
}

/// In-memory provider for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretProvider {
    values: HashMap<String, String>,
}

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn get_secret(&self, key: &str) -> Result<String, SecretError> {
        self.values
            .get(key)
            .map(|value| value.trim().to_string())
            .ok_or_else(|| SecretError::MissingKey(key.to_string()))
    }
}
