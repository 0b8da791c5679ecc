//! langscope result normalization
//!
//! The analysis service returns its verdict in a field that might be a proper
//! JSON object, a JSON document encoded as a string, or a string that *almost*
//! is JSON (raw line breaks inside values, a Markdown fence around it). This
//! crate turns all of those into one [`CanonicalResult`].
//!
//! [`normalize`] never fails. Decoding walks an ordered list of attempts and
//! stops at the first one that yields an object:
//!
//! 1. the payload already is an object;
//! 2. the payload is a string that decodes strictly;
//! 3. the string decodes after escaping raw control characters
//!    ([`escape_control_chars`]);
//! 4. the string decodes after removing a code fence, with or without the
//!    escaping pass (skipped when [`NormalizeConfig::strip_code_fences`] is off).
//!
//! When every attempt fails the result is *degraded*: all structured fields
//! are unset and `translation` carries [`DEGRADED_PREFIX`] followed by the raw
//! payload, so there is still something to show.
//!
//! ```
//! use normalize::{normalize, RawResultPayload};
//! use serde_json::json;
//!
//! let payload = RawResultPayload::new(json!(
//!     "{\"language\":\"French\",\"confidence\":0.95,\"translation\":\"Hello\"}"
//! ))
//! .with_execution_time(0.42);
//!
//! let result = normalize(&payload);
//! assert_eq!(result.language(), Some("French"));
//! assert_eq!(result.translation(), Some("Hello"));
//! assert!(!result.is_degraded());
//! ```
use serde_json::{Map, Value};
use tracing::{debug, warn};

mod config;
mod extract;
mod sanitize;
mod types;

pub use crate::config::{NormalizeConfig, DEGRADED_PREFIX};
pub use crate::extract::UNKNOWN_LANGUAGE;
pub use crate::sanitize::{escape_control_chars, strip_code_fence};
pub use crate::types::{CanonicalResult, ExecutionTime, RawResultPayload};

use crate::extract::extract_fields;

/// Which decoding attempt produced the record. Logged for diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeStep {
    Structured,
    Strict,
    Sanitized,
    Unfenced,
}

/// Normalizes a payload with the default [`NormalizeConfig`].
pub fn normalize(payload: &RawResultPayload) -> CanonicalResult {
    normalize_with_config(payload, &NormalizeConfig::default())
}

/// Normalizes a payload. Total: every input yields a result.
pub fn normalize_with_config(payload: &RawResultPayload, cfg: &NormalizeConfig) -> CanonicalResult {
    match decode_record(&payload.result, cfg) {
        Some((record, step)) => {
            debug!(step = ?step, "payload_decoded");
            extract_fields(&record, payload.execution_time.as_ref())
        }
        None => {
            warn!(
                payload_kind = value_kind(&payload.result),
                "payload_undecodable"
            );
            degraded(&payload.result, cfg)
        }
    }
}

fn decode_record(result: &Value, cfg: &NormalizeConfig) -> Option<(Map<String, Value>, DecodeStep)> {
    match result {
        Value::Object(map) => Some((map.clone(), DecodeStep::Structured)),
        Value::String(text) => decode_text(text, cfg),
        _ => None,
    }
}

fn decode_text(text: &str, cfg: &NormalizeConfig) -> Option<(Map<String, Value>, DecodeStep)> {
    if let Some(record) = decode_object(text) {
        return Some((record, DecodeStep::Strict));
    }

    let sanitized = escape_control_chars(text);
    if let Some(record) = decode_object(&sanitized) {
        return Some((record, DecodeStep::Sanitized));
    }

    if cfg.strip_code_fences {
        if let Some(inner) = strip_code_fence(text) {
            let record = decode_object(inner).or_else(|| decode_object(&escape_control_chars(inner)));
            if let Some(record) = record {
                return Some((record, DecodeStep::Unfenced));
            }
        }
    }

    None
}

/// Strict decode that only accepts a top-level object.
///
/// Valid JSON that is not an object (`"\"hello\""`, `"42"`, `"[]"`) is
/// rejected on purpose: it degrades with the raw text shown, rather than
/// rendering as an empty `Unknown` record that hides what the service sent.
fn decode_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn degraded(raw: &Value, cfg: &NormalizeConfig) -> CanonicalResult {
    let raw_text = match raw {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    CanonicalResult {
        translation: Some(format!("{}{}", cfg.degraded_prefix, raw_text)),
        degraded: true,
        ..CanonicalResult::default()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
