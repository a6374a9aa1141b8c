use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const INBOUND_ACTIONS: [&str; 6] = [
    "chatReady",
    "chatButtonIcon",
    "chatButtonStatus",
    "updateChatButtonColor",
    "updateWidgetPosition",
    "closeChatWindow",
];

/// Messages the chat frame posts to the host page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action")]
pub enum InboundMessage {
    #[serde(rename = "chatReady")]
    ChatReady,

    #[serde(rename = "chatButtonIcon")]
    ChatButtonIcon {
        #[serde(default, rename = "imageUrl", deserialize_with = "lenient_string")]
        image_url: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        svg: Option<String>,
        #[serde(default, deserialize_with = "lenient_number")]
        radius: Option<f64>,
    },

    #[serde(rename = "chatButtonStatus")]
    ChatButtonStatus {
        #[serde(default, deserialize_with = "lenient_bool")]
        visible: Option<bool>,
    },

    #[serde(rename = "updateChatButtonColor")]
    UpdateChatButtonColor {
        #[serde(default, deserialize_with = "lenient_string")]
        color: Option<String>,
    },

    #[serde(rename = "updateWidgetPosition")]
    UpdateWidgetPosition {
        #[serde(default, deserialize_with = "lenient_string")]
        position: Option<String>,
    },

    #[serde(rename = "closeChatWindow")]
    CloseChatWindow,
}

impl InboundMessage {
    pub fn action(&self) -> &'static str {
        match self {
            Self::ChatReady => "chatReady",
            Self::ChatButtonIcon { .. } => "chatButtonIcon",
            Self::ChatButtonStatus { .. } => "chatButtonStatus",
            Self::UpdateChatButtonColor { .. } => "updateChatButtonColor",
            Self::UpdateWidgetPosition { .. } => "updateWidgetPosition",
            Self::CloseChatWindow => "closeChatWindow",
        }
    }
}

/// Messages the host page posts into the chat frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action")]
pub enum OutboundMessage {
    #[serde(rename = "getChatButtonIcon")]
    GetChatButtonIcon,
    #[serde(rename = "getChatButtonStatus")]
    GetChatButtonStatus,
    #[serde(rename = "openChatWindow")]
    OpenChatWindow,
}

impl OutboundMessage {
    pub fn action(self) -> &'static str {
        match self {
            Self::GetChatButtonIcon => "getChatButtonIcon",
            Self::GetChatButtonStatus => "getChatButtonStatus",
            Self::OpenChatWindow => "openChatWindow",
        }
    }

    pub fn to_value(self) -> Value {
        serde_json::json!({ "action": self.action() })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Message(InboundMessage),
    /// Well-formed payload with an action this host does not know.
    Unknown(String),
    Malformed(String),
}

pub fn decode_inbound(payload: &Value) -> Decoded {
    let Some(action) = payload.get("action").and_then(Value::as_str) else {
        return Decoded::Malformed("payload has no string action".to_string());
    };

    if !INBOUND_ACTIONS.contains(&action) {
        return Decoded::Unknown(action.to_string());
    }

    match InboundMessage::deserialize(payload) {
        Ok(message) => Decoded::Message(message),
        Err(error) => Decoded::Malformed(format!("{action}: {error}")),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => Some(value),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(value)) => Some(value),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(value)) => value.as_f64(),
        Some(Value::String(value)) => value.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|value| value.is_finite()))
}
