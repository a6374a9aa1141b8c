use crate::config::{ConfigOverrides, WidgetConfig};
use crate::gate::{self, GateDecision};
use crate::origin::normalize_origin;
use crate::resolver::{ConfigResolver, ConfigTransport, WelcomeConfig};
use crate::tenant::{EmbedSource, TenantIdentity, resolve_tenant};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootError {
    #[error("widget blocked for origin {page_origin:?}")]
    OriginBlocked { page_origin: String },
    #[error("host environment unavailable: {0}")]
    Host(String),
}

/// Everything needed to mount the widget once the gate has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootPlan {
    pub config: WidgetConfig,
    pub tenant: TenantIdentity,
    pub frame_url: String,
    pub welcome: Option<WelcomeConfig>,
}

/// Resolves tenant and remote configuration and applies the origin gate.
///
/// Nothing here touches the page; a blocked origin is reported as
/// [`BootError::OriginBlocked`] after a single warning.
pub async fn prepare<T: ConfigTransport + ?Sized>(
    transport: &T,
    source: &EmbedSource,
    overrides: &ConfigOverrides,
) -> Result<BootPlan, BootError> {
    let config = WidgetConfig::with_overrides(overrides);
    let tenant = resolve_tenant(source);
    let resolver = ConfigResolver::new(transport, &config);

    let page_origin = source
        .page_url
        .as_deref()
        .map(normalize_origin)
        .unwrap_or_default();
    let allow_list = resolver.allowed_origins(&tenant).await;

    if let GateDecision::Blocked { page_origin } = gate::evaluate(&page_origin, &allow_list) {
        tracing::warn!(
            %page_origin,
            empresa = tenant.empresa(),
            "chat widget is blocked for this site"
        );
        return Err(BootError::OriginBlocked { page_origin });
    }

    let welcome = resolver.welcome(&tenant).await;
    let frame_url = config.chat_frame_url(&tenant);
    tracing::info!(
        empresa = tenant.empresa(),
        bot = tenant.bot_id(),
        restricted = !allow_list.is_empty(),
        greeting = welcome.as_ref().is_some_and(|welcome| welcome.enabled),
        "chat widget boot plan ready"
    );

    Ok(BootPlan {
        config,
        tenant,
        frame_url,
        welcome,
    })
}
