use serde_json::Value;

use crate::origin::normalize_origin;

/// Ordered, de-duplicated list of normalized origins allowed to host the
/// widget. Empty means no restriction was configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOriginSet {
    origins: Vec<String>,
}

impl AllowedOriginSet {
    pub fn from_origins<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut origins: Vec<String> = Vec::new();
        for value in raw {
            let origin = normalize_origin(value.as_ref());
            if !origin.is_empty() && !origins.contains(&origin) {
                origins.push(origin);
            }
        }
        Self { origins }
    }

    /// Accepts a JSON array, an object (values in insertion order) or a
    /// single string. Non-string entries are dropped.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::from_origins(items.iter().filter_map(Value::as_str)),
            Value::Object(map) => Self::from_origins(map.values().filter_map(Value::as_str)),
            Value::String(single) => Self::from_origins([single.as_str()]),
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.origins
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Blocked { page_origin: String },
}

/// An empty allow-list permits every origin; otherwise the normalized page
/// origin must be listed exactly.
pub fn is_allowed(page_origin: &str, allow_list: &AllowedOriginSet) -> bool {
    if allow_list.is_empty() {
        return true;
    }
    let normalized = normalize_origin(page_origin);
    !normalized.is_empty() && allow_list.contains(&normalized)
}

pub fn evaluate(page_origin: &str, allow_list: &AllowedOriginSet) -> GateDecision {
    if is_allowed(page_origin, allow_list) {
        GateDecision::Allowed
    } else {
        GateDecision::Blocked {
            page_origin: normalize_origin(page_origin),
        }
    }
}
