use tomos_widget_core::tenant::EMPRESA_PARAM;

/// Embed scripts the loader may have been included from. `currentScript`
/// is null once the wasm module starts, so the element is looked up again.
pub(crate) const EMBED_SCRIPT_SELECTOR: &str = "script[data-empresa], script[src*=\"empresa=\"]";

pub(crate) const EMPRESA_ATTR: &str = "data-empresa";
pub(crate) const BOT_ATTR: &str = "data-bot";
pub(crate) const STORE_URL_ATTR: &str = "data-store-url";
pub(crate) const CHAT_URL_ATTR: &str = "data-chat-url";
pub(crate) const DEBUG_ATTR: &str = "data-debug";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ScriptCandidate {
    pub(crate) src: Option<String>,
    pub(crate) has_empresa_attr: bool,
}

/// Picks the embed among the scripts matching [`EMBED_SCRIPT_SELECTOR`]:
/// an explicit `data-empresa` first, then the first `src` naming a tenant.
pub(crate) fn pick_embed_script(candidates: &[ScriptCandidate]) -> Option<usize> {
    candidates
        .iter()
        .position(|candidate| candidate.has_empresa_attr)
        .or_else(|| {
            candidates.iter().position(|candidate| {
                candidate
                    .src
                    .as_deref()
                    .is_some_and(|src| src_names_tenant(src))
            })
        })
}

fn src_names_tenant(src: &str) -> bool {
    let Some((_, query)) = src.split_once('?') else {
        return false;
    };
    let query = query.split('#').next().unwrap_or_default();
    query.split('&').any(|pair| {
        pair.split_once('=')
            .is_some_and(|(key, value)| key == EMPRESA_PARAM && !value.trim().is_empty())
    })
}
