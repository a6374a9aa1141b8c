use serde::Serialize;
use url::Url;

pub const DEFAULT_EMPRESA: &str = "Boletum";
pub const DEFAULT_BOT_ID: &str = "default";

pub const EMPRESA_PARAM: &str = "empresa";
pub const BOT_PARAM: &str = "bot";

/// Business and bot the widget is embedded for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantIdentity {
    empresa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bot: Option<String>,
}

impl TenantIdentity {
    pub fn new(empresa: &str, bot: Option<&str>) -> Self {
        let empresa = non_blank(Some(empresa)).unwrap_or_else(|| DEFAULT_EMPRESA.to_string());
        Self {
            empresa,
            bot: non_blank(bot),
        }
    }

    pub fn empresa(&self) -> &str {
        &self.empresa
    }

    /// Bot identifier used for store lookups.
    pub fn bot_id(&self) -> &str {
        self.bot.as_deref().unwrap_or(DEFAULT_BOT_ID)
    }

    /// Bot identifier only when the embedder supplied one.
    pub fn explicit_bot(&self) -> Option<&str> {
        self.bot.as_deref()
    }
}

impl Default for TenantIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_EMPRESA, None)
    }
}

/// Everything the host page exposes about how the widget was embedded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedSource {
    pub empresa_attr: Option<String>,
    pub bot_attr: Option<String>,
    pub script_src: Option<String>,
    pub page_url: Option<String>,
}

impl EmbedSource {
    fn page(&self) -> Option<Url> {
        self.page_url
            .as_deref()
            .and_then(|raw| Url::parse(raw.trim()).ok())
    }

    fn script(&self, page: Option<&Url>) -> Option<Url> {
        let raw = self.script_src.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match page {
            Some(base) => base.join(raw).ok(),
            None => Url::parse(raw).ok(),
        }
    }
}

/// Resolves the tenant: attribute, then script query, then page query, then
/// the built-in default.
pub fn resolve_tenant(source: &EmbedSource) -> TenantIdentity {
    let page = source.page();
    let script = source.script(page.as_ref());

    let lookup = |attr: Option<&str>, param: &str| -> Option<String> {
        non_blank(attr)
            .or_else(|| script.as_ref().and_then(|url| query_param(url, param)))
            .or_else(|| page.as_ref().and_then(|url| query_param(url, param)))
    };

    let empresa = lookup(source.empresa_attr.as_deref(), EMPRESA_PARAM);
    let bot = lookup(source.bot_attr.as_deref(), BOT_PARAM);

    TenantIdentity::new(empresa.as_deref().unwrap_or(DEFAULT_EMPRESA), bot.as_deref())
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .and_then(|(_, value)| non_blank(Some(value.as_ref())))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}
