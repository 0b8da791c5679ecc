use async_trait::async_trait;
use input::{FileInput, InputKind};
use serde_json::{Map, Value};

use crate::error::TransportError;

/// What one analysis endpoint answered, reduced to the fields the
/// orchestrator acts on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceResponse {
    /// The `result` (text) or `analysis` (file) field. `Null` when absent.
    pub result: Value,
    pub execution_time: Option<Value>,
    /// Transcript of a file's audio track, verbatim.
    pub transcription: Option<String>,
    /// Set when the service reported a non-empty `error`.
    pub error: Option<String>,
}

/// The seam between the orchestrator and whatever talks to the service.
///
/// [`crate::HttpBackend`] is the production implementation. Tests plug in
/// their own to count calls or hold a request open.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze_text(
        &self,
        request_id: &str,
        text: &str,
    ) -> Result<ServiceResponse, TransportError>;

    async fn analyze_file(
        &self,
        request_id: &str,
        file: &FileInput,
    ) -> Result<ServiceResponse, TransportError>;
}

/// Reads a 2xx body from either endpoint.
///
/// Only the outer shape is checked here. Whatever sits in the result field
/// is left for the normalizer, however broken it is.
pub fn parse_service_response(
    kind: InputKind,
    body: Value,
) -> Result<ServiceResponse, TransportError> {
    let mut map = match body {
        Value::Object(map) => map,
        other => {
            return Err(TransportError::Decode(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            )))
        }
    };

    let result_key = match kind {
        InputKind::Text => "result",
        InputKind::File => "analysis",
    };

    Ok(ServiceResponse {
        result: map.remove(result_key).unwrap_or(Value::Null),
        execution_time: map.remove("execution_time").filter(|v| !v.is_null()),
        transcription: match kind {
            InputKind::File => map.remove("transcription").and_then(text_of),
            InputKind::Text => None,
        },
        error: error_detail(&mut map),
    })
}

/// Pulls a usable message out of an `error` field: non-empty strings as-is,
/// other truthy values as compact JSON.
pub(crate) fn error_detail(map: &mut Map<String, Value>) -> Option<String> {
    match map.remove("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
