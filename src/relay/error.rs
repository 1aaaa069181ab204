use thiserror::Error;

use crate::secrets::SecretError;
use crate::signature::SignatureError;

/// Failures that abort an invocation. Upstream Support API and webhook
/// failures are not here: they end in a chat reply or a log line instead.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("secret lookup failed: {0}")]
    Secret(#[from] SecretError),

    #[error("signing failed: {0}")]
    Signature(#[from] SignatureError),

    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}
