//! Field extraction from a decoded result record.
//!
//! Presence follows JavaScript truthiness because that is how the service's
//! consumers have always read these records: `null`, `false`, `0`, `NaN` and
//! `""` count as absent.
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{format_number, CanonicalResult, ExecutionTime};

/// Placeholder language for records that do not name one.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|value| truthy(value))
}

fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

/// Reads a confidence value and maps it into `[0, 1]`.
///
/// Numeric strings are accepted. Values in `(1, 100]` are read as
/// percentages. Anything negative, non-finite or above 100 is dropped.
///
/// The cut at 1 is the only signal of scale, so a fractional value just above
/// it is a percentage too: `1.5` means 1.5%, not 150%.
fn confidence(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    if raw <= 1.0 {
        Some(raw)
    } else if raw <= 100.0 {
        debug!(raw, "confidence_read_as_percentage");
        Some(raw / 100.0)
    } else {
        debug!(raw, "confidence_out_of_range");
        None
    }
}

pub(crate) fn extract_fields(
    record: &Map<String, Value>,
    sibling_time: Option<&Value>,
) -> CanonicalResult {
    let language = field(record, "language")
        .map(display_string)
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

    let summary = field(record, "summary").map(display_string);
    let translation = field(record, "translation")
        .map(display_string)
        .or_else(|| summary.clone());

    let execution_time = sibling_time
        .filter(|value| truthy(value))
        .or_else(|| field(record, "execution_time"))
        .map(ExecutionTime::from_value);

    CanonicalResult {
        language: Some(language),
        confidence: field(record, "confidence").and_then(confidence),
        translation,
        summary,
        execution_time,
        degraded: false,
    }
}
