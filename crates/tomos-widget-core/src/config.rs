use url::Url;

use crate::discovery::DiscoveryPolicy;
use crate::origin::{normalize_origin, origin_host};
use crate::tenant::{BOT_PARAM, EMPRESA_PARAM, TenantIdentity};

pub const DEFAULT_STORE_BASE_URL: &str =
    "https://timbre-c9547-default-rtdb.europe-west1.firebasedatabase.app";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://tomos.bot/chat.html";
pub const DEFAULT_FRAME_HOST: &str = "tomos.bot";
pub const DEFAULT_LAUNCHER_GLYPH: &str = "\u{1F4AC}";
pub const DEFAULT_CLOSE_GLYPH: &str = "\u{2715}";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("url must not be empty")]
    EmptyUrl,
    #[error("url must use http:// or https:// and include a host: {0}")]
    InvalidUrl(String),
}

/// Optional per-embed overrides read from the embedding element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub store_url: Option<String>,
    pub chat_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub store_base_url: String,
    pub chat_endpoint: String,
    /// Substring every inbound message origin must contain.
    pub frame_host: String,
    pub discovery: DiscoveryPolicy,
    pub launcher_glyph: String,
    pub close_glyph: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            store_base_url: DEFAULT_STORE_BASE_URL.to_string(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            frame_host: DEFAULT_FRAME_HOST.to_string(),
            discovery: DiscoveryPolicy::default(),
            launcher_glyph: DEFAULT_LAUNCHER_GLYPH.to_string(),
            close_glyph: DEFAULT_CLOSE_GLYPH.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Applies embed overrides on top of the defaults. Invalid overrides are
    /// logged and ignored.
    pub fn with_overrides(overrides: &ConfigOverrides) -> Self {
        let mut config = Self::default();

        if let Some(raw) = overrides.store_url.as_deref() {
            match normalize_base_url(raw) {
                Ok(store_base_url) => config.store_base_url = store_base_url,
                Err(error) => {
                    tracing::warn!(%error, "ignoring store url override");
                }
            }
        }

        if let Some(raw) = overrides.chat_url.as_deref() {
            match normalize_base_url(raw) {
                Ok(chat_endpoint) => {
                    if let Some(host) = origin_host(&chat_endpoint) {
                        config.frame_host = host;
                    }
                    config.chat_endpoint = chat_endpoint;
                }
                Err(error) => {
                    tracing::warn!(%error, "ignoring chat url override");
                }
            }
        }

        config
    }

    /// `<store>/<path>.json`
    pub fn store_url(&self, path: &str) -> String {
        format!("{}/{path}.json", self.store_base_url)
    }

    /// Chat frame address carrying the tenant in its query string.
    pub fn chat_frame_url(&self, tenant: &TenantIdentity) -> String {
        let Ok(mut url) = Url::parse(&self.chat_endpoint) else {
            return self.chat_endpoint.clone();
        };
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(EMPRESA_PARAM, tenant.empresa());
            if let Some(bot) = tenant.explicit_bot() {
                query.append_pair(BOT_PARAM, bot);
            }
        }
        url.to_string()
    }

    /// Target origin for outbound frame messages.
    pub fn frame_origin(&self) -> String {
        let origin = normalize_origin(&self.chat_endpoint);
        if origin.is_empty() {
            "*".to_string()
        } else {
            origin
        }
    }
}

pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyUrl);
    }
    let parsed = Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl(trimmed.to_string()))?;
    let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());
    if !matches!(parsed.scheme(), "http" | "https") || !has_host {
        return Err(ConfigError::InvalidUrl(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_hosted_chat() {
        let config = WidgetConfig::default();
        assert_eq!(config.frame_host, "tomos.bot");
        assert_eq!(config.frame_origin(), "https://tomos.bot");
        assert_eq!(
            config.store_url("empresas/Acme/bots/default/config/welcome"),
            format!("{DEFAULT_STORE_BASE_URL}/empresas/Acme/bots/default/config/welcome.json")
        );
    }

    #[test]
    fn chat_frame_url_carries_tenant() {
        let config = WidgetConfig::default();
        assert_eq!(
            config.chat_frame_url(&TenantIdentity::new("Acme Corp", None)),
            "https://tomos.bot/chat.html?empresa=Acme+Corp"
        );
        assert_eq!(
            config.chat_frame_url(&TenantIdentity::new("Acme", Some("ventas"))),
            "https://tomos.bot/chat.html?empresa=Acme&bot=ventas"
        );
    }

    #[test]
    fn overrides_replace_endpoints_and_frame_host() {
        let config = WidgetConfig::with_overrides(&ConfigOverrides {
            store_url: Some(" https://store.example/ ".to_string()),
            chat_url: Some("https://staging.tomos.bot/chat.html".to_string()),
        });
        assert_eq!(config.store_base_url, "https://store.example");
        assert_eq!(config.chat_endpoint, "https://staging.tomos.bot/chat.html");
        assert_eq!(config.frame_host, "staging.tomos.bot");
    }

    #[test]
    fn invalid_overrides_keep_defaults() {
        let config = WidgetConfig::with_overrides(&ConfigOverrides {
            store_url: Some("ftp://store.example".to_string()),
            chat_url: Some("   ".to_string()),
        });
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn normalize_base_url_rejects_hostless_values() {
        assert_eq!(normalize_base_url(""), Err(ConfigError::EmptyUrl));
        assert!(matches!(
            normalize_base_url("store.example"),
            Err(ConfigError::InvalidUrl(_))
        ));
    }
}
