use serde::Serialize;

/// One renderable piece of the launcher icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IconNode {
    Image { url: String },
    Svg { markup: String },
    Glyph { text: String },
}

/// Picks the icon for a `chatButtonIcon` update. Inline vector markup wins
/// over a raster URL; with neither, the built-in glyph is used.
pub fn select_icon(image_url: Option<&str>, svg: Option<&str>, fallback_glyph: &str) -> Vec<IconNode> {
    if let Some(markup) = svg.filter(|markup| looks_like_svg(markup)) {
        return vec![IconNode::Svg {
            markup: markup.trim().to_string(),
        }];
    }

    if let Some(url) = image_url.map(str::trim).filter(|url| !url.is_empty()) {
        return vec![IconNode::Image {
            url: url.to_string(),
        }];
    }

    vec![IconNode::Glyph {
        text: fallback_glyph.to_string(),
    }]
}

fn looks_like_svg(markup: &str) -> bool {
    markup.to_ascii_lowercase().contains("<svg")
}

/// The persistent default icon plus an optional transient overlay shown
/// while the chat is open. What the launcher displays is the overlay when
/// present, otherwise the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSlots {
    persistent_default: Vec<IconNode>,
    transient_overlay: Option<Vec<IconNode>>,
}

impl IconSlots {
    pub fn new(persistent_default: Vec<IconNode>) -> Self {
        Self {
            persistent_default,
            transient_overlay: None,
        }
    }

    pub fn showing(&self) -> &[IconNode] {
        self.transient_overlay
            .as_deref()
            .unwrap_or(&self.persistent_default)
    }

    pub fn persistent_default(&self) -> &[IconNode] {
        &self.persistent_default
    }

    pub fn is_overlay_shown(&self) -> bool {
        self.transient_overlay.is_some()
    }

    /// Returns true when the displayed icon changed.
    pub fn replace_default(&mut self, nodes: Vec<IconNode>) -> bool {
        self.persistent_default = nodes;
        !self.is_overlay_shown()
    }

    /// Returns true when the displayed icon changed.
    pub fn show_overlay(&mut self, nodes: Vec<IconNode>) -> bool {
        if self.transient_overlay.as_ref() == Some(&nodes) {
            return false;
        }
        self.transient_overlay = Some(nodes);
        true
    }

    /// Returns true when the displayed icon changed.
    pub fn restore(&mut self) -> bool {
        self.transient_overlay.take().is_some()
    }
}
