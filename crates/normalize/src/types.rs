use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A result payload exactly as the analysis service sent it.
///
/// `result` is whatever sat in the response's `result`/`analysis` field:
/// usually an object or a JSON-encoded string, but any JSON value is accepted
/// (`Value::Null` when the field was missing). `execution_time` is the sibling
/// timing value from the same response, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawResultPayload {
    pub result: Value,
    pub execution_time: Option<Value>,
}

impl RawResultPayload {
    pub fn new(result: impl Into<Value>) -> Self {
        Self {
            result: result.into(),
            execution_time: None,
        }
    }

    pub fn with_execution_time(mut self, execution_time: impl Into<Value>) -> Self {
        self.execution_time = Some(execution_time.into());
        self
    }
}

/// How long the service took, as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExecutionTime {
    Seconds(f64),
    Text(String),
}

impl ExecutionTime {
    pub(crate) fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(secs) => ExecutionTime::Seconds(secs),
                None => ExecutionTime::Text(n.to_string()),
            },
            Value::String(s) => ExecutionTime::Text(s.clone()),
            other => ExecutionTime::Text(other.to_string()),
        }
    }
}

impl fmt::Display for ExecutionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionTime::Seconds(secs) => f.write_str(&format_number(*secs)),
            ExecutionTime::Text(text) => f.write_str(text),
        }
    }
}

/// Formats a number the way the service's clients print it: integral values
/// without a fractional part, everything else with the shortest exact digits.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// The normalized analysis result.
///
/// Only [`normalize`](crate::normalize) builds these, and nothing mutates them
/// afterwards; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct CanonicalResult {
    pub(crate) language: Option<String>,
    pub(crate) confidence: Option<f64>,
    pub(crate) translation: Option<String>,
    pub(crate) summary: Option<String>,
    pub(crate) execution_time: Option<ExecutionTime>,
    pub(crate) degraded: bool,
}

impl CanonicalResult {
    /// Detected language, `"Unknown"` when the record had none.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Confidence in `[0, 1]`.
    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// Translation, or the summary when the record had no translation.
    /// On a degraded result this holds the diagnostic text.
    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn execution_time(&self) -> Option<&ExecutionTime> {
        self.execution_time.as_ref()
    }

    /// True when the payload could not be decoded at all.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}
