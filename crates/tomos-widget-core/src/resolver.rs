use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::WidgetConfig;
use crate::gate::AllowedOriginSet;
use crate::tenant::TenantIdentity;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("invalid json body: {0}")]
    Decode(String),
}

/// Read-only access to the remote key-value store.
#[async_trait(?Send)]
pub trait ConfigTransport {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError>;
}

/// Logical configuration entries stored per tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLeaf {
    AllowedOrigins,
    Welcome,
}

impl ConfigLeaf {
    pub fn key(self) -> &'static str {
        match self {
            Self::AllowedOrigins => "allowedUrls",
            Self::Welcome => "welcome",
        }
    }

    /// Whether a decoded body carries usable data for this leaf.
    pub fn is_usable(self, value: &Value) -> bool {
        match self {
            Self::AllowedOrigins => !AllowedOriginSet::from_value(value).is_empty(),
            Self::Welcome => WelcomeConfig::from_value(value).is_some(),
        }
    }
}

/// Candidate store paths for `leaf`, newest schema first.
pub fn candidate_paths(tenant: &TenantIdentity, leaf: ConfigLeaf) -> Vec<String> {
    let empresa = urlencoding::encode(tenant.empresa());
    let bot = urlencoding::encode(tenant.bot_id());
    let key = leaf.key();
    vec![
        format!("empresas/{empresa}/config/bots/{bot}/config/{key}"),
        format!("empresas/{empresa}/bots/{bot}/config/{key}"),
        format!("{empresa}/bots/{bot}/config/{key}"),
    ]
}

/// Greeting shown next to the launcher before the chat is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WelcomeConfig {
    pub enabled: bool,
    pub text: String,
}

impl WelcomeConfig {
    const TEXT_KEYS: [&'static str; 4] = ["text", "message", "mensaje", "texto"];

    /// Accepts `{text, enabled}` (with a few legacy text keys) or a bare
    /// string. Blank text is treated as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let (enabled, text) = match value {
            Value::String(text) => (true, text.as_str()),
            Value::Object(map) => {
                let text = Self::TEXT_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))?;
                let enabled = map.get("enabled").and_then(Value::as_bool).unwrap_or(true);
                (enabled, text)
            }
            _ => return None,
        };

        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            enabled,
            text: text.to_string(),
        })
    }

    /// Text to show, if the greeting is switched on.
    pub fn active_text(&self) -> Option<&str> {
        self.enabled.then_some(self.text.as_str())
    }
}

/// Queries candidate store paths in order until one yields usable data.
pub struct ConfigResolver<'a, T: ConfigTransport + ?Sized> {
    transport: &'a T,
    config: &'a WidgetConfig,
}

impl<'a, T: ConfigTransport + ?Sized> ConfigResolver<'a, T> {
    pub fn new(transport: &'a T, config: &'a WidgetConfig) -> Self {
        Self { transport, config }
    }

    /// First usable value across the candidate paths, or `None` when every
    /// candidate failed or was empty.
    pub async fn resolve(&self, tenant: &TenantIdentity, leaf: ConfigLeaf) -> Option<Value> {
        for path in candidate_paths(tenant, leaf) {
            let url = self.config.store_url(&path);
            match self.transport.get_json(&url).await {
                Ok(value) if leaf.is_usable(&value) => {
                    tracing::debug!(leaf = leaf.key(), %path, "resolved tenant config");
                    return Some(value);
                }
                Ok(_) => {
                    tracing::debug!(leaf = leaf.key(), %path, "config candidate is empty");
                }
                Err(error) => {
                    tracing::warn!(leaf = leaf.key(), %path, %error, "config candidate failed");
                }
            }
        }
        None
    }

    pub async fn allowed_origins(&self, tenant: &TenantIdentity) -> AllowedOriginSet {
        self.resolve(tenant, ConfigLeaf::AllowedOrigins)
            .await
            .map(|value| AllowedOriginSet::from_value(&value))
            .unwrap_or_default()
    }

    pub async fn welcome(&self, tenant: &TenantIdentity) -> Option<WelcomeConfig> {
        self.resolve(tenant, ConfigLeaf::Welcome)
            .await
            .and_then(|value| WelcomeConfig::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn candidate_paths_follow_schema_history() {
        let tenant = TenantIdentity::new("Acme", None);
        assert_eq!(
            candidate_paths(&tenant, ConfigLeaf::AllowedOrigins),
            vec![
                "empresas/Acme/config/bots/default/config/allowedUrls".to_string(),
                "empresas/Acme/bots/default/config/allowedUrls".to_string(),
                "Acme/bots/default/config/allowedUrls".to_string(),
            ]
        );
    }

    #[test]
    fn candidate_paths_percent_encode_segments() {
        let tenant = TenantIdentity::new("Café & Co", Some("bot/1"));
        let paths = candidate_paths(&tenant, ConfigLeaf::Welcome);
        assert_eq!(
            paths[2],
            "Caf%C3%A9%20%26%20Co/bots/bot%2F1/config/welcome"
        );
    }

    #[test]
    fn welcome_accepts_object_and_string_forms() {
        assert_eq!(
            WelcomeConfig::from_value(&json!({"text": " hi ", "enabled": true})),
            Some(WelcomeConfig {
                enabled: true,
                text: "hi".to_string()
            })
        );
        assert_eq!(
            WelcomeConfig::from_value(&json!({"mensaje": "hola"}))
                .as_ref()
                .and_then(WelcomeConfig::active_text),
            Some("hola")
        );
        assert_eq!(
            WelcomeConfig::from_value(&json!("hello")).map(|welcome| welcome.enabled),
            Some(true)
        );
    }

    #[test]
    fn disabled_welcome_is_usable_but_inactive() {
        let welcome = WelcomeConfig::from_value(&json!({"text": "hi", "enabled": false}))
            .expect("disabled welcome still parses");
        assert_eq!(welcome.active_text(), None);
    }

    #[test]
    fn blank_or_foreign_welcome_values_are_empty() {
        assert!(WelcomeConfig::from_value(&json!({"text": "   "})).is_none());
        assert!(WelcomeConfig::from_value(&json!({"enabled": true})).is_none());
        assert!(WelcomeConfig::from_value(&json!(12)).is_none());
        assert!(WelcomeConfig::from_value(&Value::Null).is_none());
    }
}
