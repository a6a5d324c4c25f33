use paf_core::WaitValue;
use serde::Deserialize;
use serde::Serialize;

/// Value carried by a metric.
///
/// The variant is fixed by whoever produces the metric, so routing never
/// has to guess at a runtime type. On the wire a JSON string is SQL text,
/// a JSON integer in `i32` range is a wait value, and `null` or absence is
/// empty. Anything else is kept as [`Payload::Unsupported`] so that one odd
/// metric fails its own route instead of the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    SqlText(String),
    WaitValue(WaitValue),
    #[default]
    Empty,
    Unsupported(serde_json::Value),
}

impl Payload {
    /// Short variant name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SqlText(_) => "sql text",
            Self::WaitValue(_) => "wait value",
            Self::Empty => "empty",
            Self::Unsupported(_) => "unsupported",
        }
    }
    pub fn wait_value(&self) -> Option<WaitValue> {
        match self {
            Self::WaitValue(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<WaitValue> for Payload {
    fn from(value: WaitValue) -> Self {
        Self::WaitValue(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::SqlText(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::SqlText(text.to_string())
    }
}
