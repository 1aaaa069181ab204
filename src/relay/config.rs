use reqwest::Url;

use crate::error::RelayError;
use crate::publisher::DEFAULT_WEBHOOK_URL;

pub const DEFAULT_SECRET_ID: &str = "dingding-outgoing-robot-env";
/// The AWS Support API is only served from us-east-1.
pub const DEFAULT_SUPPORT_REGION: &str = "us-east-1";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub secret_id: String,
    /// Overrides the shared AWS region for Secrets Manager when set.
    pub secrets_region: Option<String>,
    pub support_region: String,
    pub webhook_url: Url,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let raw_url = get("DINGTALK_WEBHOOK_URL").unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string());
        let webhook_url = Url::parse(raw_url.trim())
            .map_err(|e| RelayError::Config(format!("DINGTALK_WEBHOOK_URL {:?}: {}", raw_url, e)))?;

        Ok(Self {
            secret_id: get("SECRET_ID").unwrap_or_else(|| DEFAULT_SECRET_ID.to_string()),
            secrets_region: get("SECRETS_REGION"),
            support_region: get("SUPPORT_REGION").unwrap_or_else(|| DEFAULT_SUPPORT_REGION.to_string()),
            webhook_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<RelayConfig, RelayError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RelayConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.secret_id, DEFAULT_SECRET_ID);
        assert_eq!(config.secrets_region, None);
        assert_eq!(config.support_region, "us-east-1");
        assert_eq!(config.webhook_url.as_str(), DEFAULT_WEBHOOK_URL);
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("SECRET_ID", "robot-secrets"),
            ("SECRETS_REGION", "ap-northeast-1"),
            ("SUPPORT_REGION", "us-east-1"),
            ("DINGTALK_WEBHOOK_URL", "http://localhost:8080/robot/send"),
        ])
        .unwrap();
        assert_eq!(config.secret_id, "robot-secrets");
        assert_eq!(config.secrets_region.as_deref(), Some("ap-northeast-1"));
        assert_eq!(config.webhook_url.as_str(), "http://localhost:8080/robot/send");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("SECRET_ID", "  ")]).unwrap();
        assert_eq!(config.secret_id, DEFAULT_SECRET_ID);
    }

    #[test]
    fn relative_webhook_url_is_rejected() {
        let err = config_from(&[("DINGTALK_WEBHOOK_URL", "robot/send")]).unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }
}
