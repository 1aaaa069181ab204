use chrono::Utc;
use lambda_http::{Body, Error, Request, Response};
use serde_json::json;
use tracing::{info, warn};

use crate::relay::{Outcome, Relay};
use crate::types::{InboundRequest, RobotCallback};

pub const TIMESTAMP_HEADER: &str = "timestamp";
pub const SIGN_HEADER: &str = "sign";

fn header_value<'a>(event: &'a Request, name: &str) -> &'a str {
    event
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .trim()
}

fn bad_request() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(400)
        .header("Content-Type", "text/plain")
        .body(Body::from("Bad Request"))?)
}

pub async fn function_handler(relay: &Relay, event: Request) -> Result<Response<Body>, Error> {
    // Get body as string
    let body_bytes = event.body().to_vec();
    let body_string = match String::from_utf8(body_bytes) {
        Ok(body) => body,
        Err(e) => {
            warn!("Robot callback body is not UTF-8: {}", e);
            return bad_request();
        }
    };

    let callback: RobotCallback = match serde_json::from_str(&body_string) {
        Ok(callback) => callback,
        Err(e) => {
            warn!("Robot callback body could not be decoded: {}", e);
            return bad_request();
        }
    };
    info!(
        sender = callback.sender_nick.as_deref().unwrap_or(""),
        conversation = callback.conversation_title.as_deref().unwrap_or(""),
        msgtype = callback.msgtype.as_deref().unwrap_or(""),
        "Robot callback received"
    );

    let request = InboundRequest {
        timestamp: header_value(&event, TIMESTAMP_HEADER).to_string(),
        signature: header_value(&event, SIGN_HEADER).to_string(),
        message_text: callback.text.content.trim().to_string(),
    };

    let delivered = match relay.handle(&request, Utc::now()).await? {
        Outcome::Rejected => {
            return Ok(Response::builder()
                .status(401)
                .header("Content-Type", "text/plain")
                .body(Body::from("Unauthorized"))?);
        }
        Outcome::Delivered(_) => true,
        Outcome::PublishFailed(_) => false,
    };

    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .body(Body::from(json!({ "delivered": delivered }).to_string()))?)
}
