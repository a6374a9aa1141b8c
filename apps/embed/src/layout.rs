use tomos_widget_core::WidgetPosition;

pub(crate) const STYLE_ID: &str = "tomos-chat-widget-style";
pub(crate) const LAUNCHER_ID: &str = "tomos-chat-launcher";
pub(crate) const BUBBLE_ID: &str = "tomos-chat-bubble";
pub(crate) const BUBBLE_TEXT_ID: &str = "tomos-chat-bubble-text";
pub(crate) const BUBBLE_CLOSE_ID: &str = "tomos-chat-bubble-close";
pub(crate) const FRAME_ID: &str = "tomos-chat-frame";

pub(crate) const POSITION_ATTR: &str = "data-position";
pub(crate) const LOADED_ATTR: &str = "data-loaded";
pub(crate) const FRAME_ALLOW: &str = "clipboard-write; clipboard-read";
pub(crate) const ICON_SIZE_PX: &str = "28";

/// Elements anchored by [`WidgetPosition`].
pub(crate) const POSITIONED_IDS: [&str; 3] = [LAUNCHER_ID, BUBBLE_ID, FRAME_ID];

pub(crate) fn launcher_display(visible: bool) -> &'static str {
    if visible { "flex" } else { "none" }
}

pub(crate) fn block_display(visible: bool) -> &'static str {
    if visible { "block" } else { "none" }
}

/// CSS for a `chatButtonIcon` radius. Non-finite or negative values are
/// dropped.
pub(crate) fn radius_css(percent: f64) -> Option<String> {
    (percent.is_finite() && percent >= 0.0).then(|| format!("{percent}%"))
}

/// Horizontal anchoring for one position: `left`, `right` and the
/// translate applied on top of the element's own transform.
fn anchor(position: WidgetPosition) -> (&'static str, &'static str, &'static str) {
    match position {
        WidgetPosition::Left => ("24px", "auto", "0"),
        WidgetPosition::Center => ("50%", "auto", "-50%"),
        WidgetPosition::Right => ("auto", "24px", "0"),
    }
}

fn placement_rules(id: &str) -> String {
    [
        WidgetPosition::Left,
        WidgetPosition::Center,
        WidgetPosition::Right,
    ]
    .into_iter()
    .map(|position| {
        let (left, right, shift) = anchor(position);
        format!(
            "#{id}[{POSITION_ATTR}=\"{}\"]{{left:{left};right:{right};--tomos-shift:{shift};}}\n",
            position.as_str()
        )
    })
    .collect()
}

/// Stylesheet injected once into the host page head.
pub(crate) fn stylesheet() -> String {
    let mut css = format!(
        "#{LAUNCHER_ID}{{position:fixed;bottom:24px;z-index:99999;--tomos-shift:0;\
background:#111;color:#fff;border:none;border-radius:50%;width:60px;height:60px;\
display:none;align-items:center;justify-content:center;cursor:pointer;font-size:26px;\
box-shadow:0 4px 8px rgba(0,0,0,0.25);\
transition:transform .25s ease,box-shadow .25s ease,border-radius .25s ease;\
transform:translateX(var(--tomos-shift));}}\n\
#{LAUNCHER_ID}:hover{{transform:translateX(var(--tomos-shift)) scale(1.05);\
box-shadow:0 6px 14px rgba(0,0,0,0.3);}}\n\
#{LAUNCHER_ID}::after{{content:\"\";position:absolute;bottom:0;right:-2px;width:13px;height:13px;\
background:#2ecc71;border-radius:50%;border:2px solid #fff;}}\n\
#{BUBBLE_ID}{{position:fixed;bottom:96px;z-index:99999;--tomos-shift:0;display:none;\
max-width:260px;padding:12px 32px 12px 14px;background:#fff;color:#111;border-radius:14px;\
font:14px/1.4 system-ui,-apple-system,sans-serif;box-shadow:0 4px 16px rgba(0,0,0,0.18);\
transform:translateX(var(--tomos-shift));}}\n\
#{BUBBLE_CLOSE_ID}{{position:absolute;top:4px;right:6px;border:none;background:transparent;\
color:#666;cursor:pointer;font-size:13px;line-height:1;padding:4px;}}\n\
#{FRAME_ID}{{position:fixed;bottom:90px;z-index:99999;--tomos-shift:0;width:420px;\
height:90vh;max-height:calc(100vh - 110px);border:none;border-radius:18px;\
box-shadow:0 6px 24px rgba(0,0,0,0.2);display:none;overflow:hidden;\
transform:translateX(var(--tomos-shift));}}\n"
    );
    for id in POSITIONED_IDS {
        css.push_str(&placement_rules(id));
    }
    css.push_str(&format!(
        "@media (max-width:640px){{#{FRAME_ID},#{FRAME_ID}[{POSITION_ATTR}]{{width:100%;height:100%;\
max-height:none;bottom:0;left:0;right:0;border-radius:0;--tomos-shift:0;transform:none;}}}}\n"
    ));
    css
}
