use crate::url_model::is_remote_url;
use serde_json::Value;

/// Legacy leading segment older catalogs stored before the asset prefix.
pub const LEGACY_ROOT_SEGMENT: &str = "assets/";

/// Classification of one catalog image field, decided once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// `http(s)://` URL that still needs fetching.
    Remote(String),
    /// Path already written by an earlier run.
    Local(String),
    Empty,
}

impl ImageRef {
    /// Classify a raw JSON value: a string, or an object with a `src` string.
    /// Anything else is `Empty`.
    pub fn from_value(value: Option<&Value>) -> Self {
        let raw = match value {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Object(obj)) => match obj.get("src") {
                Some(Value::String(s)) => s.trim().to_string(),
                Some(v) if truthy(v) => v.to_string(),
                _ => String::new(),
            },
            _ => String::new(),
        };
        Self::classify(raw)
    }

    pub fn classify(raw: String) -> Self {
        if raw.is_empty() {
            ImageRef::Empty
        } else if is_remote_url(&raw) {
            ImageRef::Remote(raw)
        } else {
            ImageRef::Local(raw)
        }
    }

    pub fn remote_url(&self) -> Option<&str> {
        match self {
            ImageRef::Remote(url) => Some(url),
            _ => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImageRef::Remote(_))
    }
}

/// Strips [`LEGACY_ROOT_SEGMENT`] so stored paths stay relative to the assets directory.
pub fn strip_legacy_root(path: &str) -> &str {
    path.strip_prefix(LEGACY_ROOT_SEGMENT).unwrap_or(path)
}

/// Loose truthiness for JSON values (null, false, 0, "", [] and {} are false).
pub(crate) fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
