use serde::{Deserialize, Serialize};

/// Body of an outgoing-robot callback. Only `text.content` drives the relay;
/// the remaining fields are kept for logging.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotCallback {
    pub text: RobotText,
    #[serde(default)]
    pub msgtype: Option<String>,
    #[serde(default)]
    pub sender_nick: Option<String>,
    #[serde(default)]
    pub conversation_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RobotText {
    pub content: String,
}

/// An inbound request after header and body extraction.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub timestamp: String,
    pub signature: String,
    pub message_text: String,
}

/// The five fields a create-case command must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFields {
    pub subject: String,
    pub body: String,
    pub service_code: String,
    pub category_code: String,
    pub severity_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateCase(CaseFields),
    LookupServiceCode { service_name: String },
    ResolveCase { case_id: String },
    Unrecognized,
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::CreateCase(_) => "create_case",
            Command::LookupServiceCode { .. } => "lookup_service_code",
            Command::ResolveCase { .. } => "resolve_case",
            Command::Unrecognized => "unrecognized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyMessage {
    pub text: String,
}

impl ReplyMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Everything the Support API needs to open a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCase {
    pub subject: String,
    pub communication_body: String,
    pub service_code: String,
    pub category_code: String,
    pub severity_code: String,
    pub language: String,
    pub issue_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub code: String,
    pub name: String,
    pub categories: Vec<CategoryDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDescriptor {
    pub code: String,
    pub name: String,
}

/// DingTalk text message envelope.
#[derive(Debug, Serialize)]
pub struct TextMessage {
    pub msgtype: String,
    pub text: TextContent,
    pub at: AtSettings,
}

#[derive(Debug, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtSettings {
    pub is_at_all: bool,
}

impl From<&ReplyMessage> for TextMessage {
    fn from(reply: &ReplyMessage) -> Self {
        Self {
            msgtype: "text".to_string(),
            text: TextContent {
                content: reply.text.clone(),
            },
            at: AtSettings { is_at_all: false },
        }
    }
}

/// Query parameters of the outbound robot webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookTarget {
    pub access_token: String,
    pub timestamp: String,
    pub sign: String,
}

/// DingTalk's reply to a webhook POST.
#[derive(Debug, Deserialize)]
pub struct WebhookResponse {
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}
