use serde::Serialize;

/// Horizontal anchor shared by the launcher, the bubble and the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetPosition {
    Left,
    Center,
    #[default]
    Right,
}

impl WidgetPosition {
    /// Total: anything unrecognized, including a missing value, is `Right`.
    pub fn normalize(raw: Option<&str>) -> Self {
        let normalized = raw.unwrap_or_default().trim().to_ascii_lowercase();
        match normalized.as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            _ => Self::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}
