use async_trait::async_trait;
use input::{FileInput, InputKind};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::backend::{error_detail, parse_service_response, AnalysisBackend, ServiceResponse};
use crate::config::{ClientConfig, ConfigError};
use crate::error::TransportError;

/// Header carrying the per-submission correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Long error pages (proxies, HTML) are cut to this many chars in notices.
const MAX_DETAIL_CHARS: usize = 200;

/// [`AnalysisBackend`] over HTTP.
///
/// Text goes out as `{"text": ...}` JSON; files as a multipart form with a
/// single `file` part.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    text_url: String,
    file_url: String,
}

impl HttpBackend {
    pub fn new(cfg: &ClientConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let mut builder = Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(timeout) = cfg.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = cfg.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            text_url: cfg.endpoint_url(InputKind::Text),
            file_url: cfg.endpoint_url(InputKind::File),
        })
    }

    pub fn url_for(&self, kind: InputKind) -> &str {
        match kind {
            InputKind::Text => &self.text_url,
            InputKind::File => &self.file_url,
        }
    }

    async fn send(
        &self,
        kind: InputKind,
        request_id: &str,
        request: RequestBuilder,
    ) -> Result<ServiceResponse, TransportError> {
        let response = request
            .header(REQUEST_ID_HEADER, request_id)
            .send()
            .await
            .map_err(|e| TransportError::Request(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = status_detail(response).await;
            warn!(
                kind = %kind,
                status = status.as_u16(),
                detail = %detail,
                "service_http_error"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        debug!(kind = %kind, status = status.as_u16(), "service_response");
        parse_service_response(kind, body)
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analyze_text(
        &self,
        request_id: &str,
        text: &str,
    ) -> Result<ServiceResponse, TransportError> {
        let request = self
            .client
            .post(&self.text_url)
            .json(&json!({ "text": text }));
        self.send(InputKind::Text, request_id, request).await
    }

    async fn analyze_file(
        &self,
        request_id: &str,
        file: &FileInput,
    ) -> Result<ServiceResponse, TransportError> {
        // `Bytes` is reference-counted; the upload shares the caller's buffer.
        let mut part = Part::stream_with_length(file.bytes.clone(), file.len() as u64)
            .file_name(file.name.clone());
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| TransportError::Request(format!("invalid content type: {e}")))?;
        }
        let form = Form::new().part("file", part);
        let request = self.client.post(&self.file_url).multipart(form);
        self.send(InputKind::File, request_id, request).await
    }
}

/// Best explanation for a non-2xx answer: the body's `error` field, the body
/// text, or nothing (the caller then falls back to the status code).
async fn status_detail(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    if let Ok(Value::Object(mut map)) = serde_json::from_str::<Value>(&body) {
        if let Some(detail) = error_detail(&mut map) {
            return detail;
        }
        return String::new();
    }
    truncate(body.trim(), MAX_DETAIL_CHARS)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "could not connect to the analysis service".to_string()
    } else {
        err.to_string()
    }
}
