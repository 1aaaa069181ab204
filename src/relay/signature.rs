use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Maximum skew between the robot's timestamp and our clock (one hour).
pub const FRESHNESS_WINDOW_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("invalid HMAC key: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),
}

/// Epoch milliseconds as DingTalk formats them in headers and query strings.
pub fn timestamp_millis(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}

/// Base64 HMAC-SHA256 of `"{timestamp}\n{app_secret}"`, keyed with the app secret.
pub fn sign(timestamp: &str, app_secret: &str) -> Result<String, SignatureError> {
    let string_to_sign = format!("{}\n{}", timestamp, app_secret);

    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes())?;
    mac.update(string_to_sign.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Checks an inbound robot callback: the timestamp must lie within the
/// freshness window around `now` and the signature must match the one
/// computed over the inbound timestamp.
pub fn verify(
    request_timestamp: &str,
    request_signature: &str,
    app_secret: &str,
    now: DateTime<Utc>,
) -> bool {
    let request_millis: i64 = match request_timestamp.parse() {
        Ok(millis) => millis,
        Err(_) => {
            warn!(timestamp = request_timestamp, "Request timestamp is not a number");
            return false;
        }
    };

    let skew = request_millis.abs_diff(now.timestamp_millis());
    if skew >= FRESHNESS_WINDOW_MS {
        warn!(skew_ms = skew, "Request timestamp outside freshness window");
        return false;
    }

    match sign(request_timestamp, app_secret) {
        Ok(reference) => reference == request_signature,
        Err(e) => {
            warn!("Failed to compute reference signature: {}", e);
            false
        }
    }
}
