//! langscope request orchestration
//!
//! [`AnalysisClient`] turns one user submission into exactly one service
//! call and one outcome:
//!
//! ```text
//! AnalysisInput -> validate -> single-flight check -> loading on
//!     -> POST /analyze_text | /analyze_file
//!     -> normalize -> present -> DisplayModel   (loading off)
//! ```
//!
//! Only one submission may be in flight per client. A second call while one
//! is running returns [`SubmitError::Busy`] immediately: no request goes out,
//! no loading signal fires and the state is left alone. Input that fails
//! validation is rejected the same way, before anything else happens.
//!
//! Loading signals go to a [`LoadingObserver`]. Every `loading_started` is
//! paired with one `loading_finished`, including when the caller drops the
//! submission future halfway.
//!
//! ```no_run
//! use client::{AnalysisClient, ClientConfig};
//! use input::AnalysisInput;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AnalysisClient::new(ClientConfig::default())?;
//! let model = client.submit(AnalysisInput::text("Bonjour")).await?;
//! println!("{} ({})", model.language, model.confidence);
//! # Ok(())
//! # }
//! ```
use std::sync::Arc;

use input::{validate_input, AnalysisInput, InputKind};
use normalize::{normalize_with_config, RawResultPayload};
use present::{present, DisplayModel, Transcription};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

mod backend;
mod config;
mod error;
mod http;
mod lifecycle;

pub use crate::backend::{parse_service_response, AnalysisBackend, ServiceResponse};
pub use crate::config::{ClientConfig, ConfigError};
pub use crate::error::{SubmitError, TransportError};
pub use crate::http::{HttpBackend, REQUEST_ID_HEADER};
pub use crate::lifecycle::{LoadingObserver, NoopObserver, Outcome, RequestState};

use crate::lifecycle::Lifecycle;

/// Orchestrates submissions against one analysis backend.
pub struct AnalysisClient<B = HttpBackend> {
    backend: B,
    config: ClientConfig,
    observer: Arc<dyn LoadingObserver>,
    lifecycle: Lifecycle,
}

impl AnalysisClient<HttpBackend> {
    /// Builds a client that talks HTTP to `config.base_url`.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let backend = HttpBackend::new(&config)?;
        Ok(Self::with_backend(backend, config))
    }
}

impl<B: AnalysisBackend> AnalysisClient<B> {
    pub fn with_backend(backend: B, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            observer: Arc::new(NoopObserver),
            lifecycle: Lifecycle::default(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoadingObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> RequestState {
        self.lifecycle.current()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs one submission to completion.
    ///
    /// Errors other than `Validation` and `Busy` leave the client in
    /// [`RequestState::Failed`]; a returned model means
    /// [`RequestState::Succeeded`].
    pub async fn submit(&self, input: AnalysisInput) -> Result<DisplayModel, SubmitError> {
        let input = validate_input(input, &self.config.input)?;
        let kind = input.kind();

        let Some(flight) = self.lifecycle.begin(kind, &self.observer) else {
            warn!(kind = %kind, "submit_rejected_busy");
            return Err(SubmitError::Busy);
        };

        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("analysis", request_id = %request_id, kind = %kind);
        match self.run(&request_id, input).instrument(span).await {
            Ok(model) => {
                flight.succeed();
                Ok(model)
            }
            Err(err) => {
                flight.fail();
                Err(err)
            }
        }
    }

    async fn run(&self, request_id: &str, input: AnalysisInput) -> Result<DisplayModel, SubmitError> {
        let kind = input.kind();
        let response = match &input {
            AnalysisInput::Text { content } => self.backend.analyze_text(request_id, content).await,
            AnalysisInput::File(file) => self.backend.analyze_file(request_id, file).await,
        };

        let response = match response {
            Ok(response) => response,
            Err(source) => {
                warn!(error = %source, "analysis_failure");
                return Err(SubmitError::Transport { kind, source });
            }
        };

        if let Some(detail) = response.error {
            warn!(detail = %detail, "analysis_rejected");
            return Err(SubmitError::Service { kind, detail });
        }

        let payload = RawResultPayload {
            result: response.result,
            execution_time: response.execution_time,
        };
        let canonical = normalize_with_config(&payload, &self.config.normalize);
        let transcription = match kind {
            InputKind::Text => Transcription::Hidden,
            InputKind::File => Transcription::Shown(response.transcription.unwrap_or_default()),
        };
        let model = present(&canonical, transcription);

        info!(
            language = %model.language,
            degraded = canonical.is_degraded(),
            "analysis_success"
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use input::{FileInput, ValidationError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::RwLock;
    use std::time::Duration;

    /// Backend that replays one canned answer and counts calls.
    struct Canned {
        answer: Result<ServiceResponse, TransportError>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn ok(response: ServiceResponse) -> Self {
            Self {
                answer: Ok(response),
                calls: AtomicUsize::new(0),
            }
        }

        fn err(err: TransportError) -> Self {
            Self {
                answer: Err(err),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisBackend for Canned {
        async fn analyze_text(
            &self,
            _request_id: &str,
            _text: &str,
        ) -> Result<ServiceResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }

        async fn analyze_file(
            &self,
            _request_id: &str,
            _file: &FileInput,
        ) -> Result<ServiceResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    #[derive(Default)]
    struct Events(RwLock<Vec<&'static str>>);

    impl LoadingObserver for Events {
        fn loading_started(&self, _kind: InputKind) {
            self.0.write().unwrap().push("start");
        }

        fn loading_finished(&self, _kind: InputKind, outcome: Outcome, _elapsed: Duration) {
            self.0.write().unwrap().push(match outcome {
                Outcome::Succeeded => "end_ok",
                Outcome::Failed => "end_err",
                Outcome::Cancelled => "end_cancelled",
            });
        }
    }

    fn client_with(backend: Canned) -> (AnalysisClient<Canned>, Arc<Events>) {
        let events = Arc::new(Events::default());
        let client = AnalysisClient::with_backend(backend, ClientConfig::default())
            .with_observer(events.clone());
        (client, events)
    }

    #[tokio::test]
    async fn text_success() {
        let (client, events) = client_with(Canned::ok(ServiceResponse {
            result: json!(r#"{"language":"French","confidence":0.95,"translation":"Hello"}"#),
            execution_time: Some(json!(0.42)),
            ..Default::default()
        }));

        let model = client.submit(AnalysisInput::text("Bonjour")).await.unwrap();
        assert_eq!(model.language, "French");
        assert_eq!(model.confidence, "95.0%");
        assert_eq!(model.translation, "Hello");
        assert_eq!(model.time, "0.42s");
        assert!(!model.show_transcription());

        assert_eq!(client.state(), RequestState::Succeeded);
        assert_eq!(*events.0.read().unwrap(), vec!["start", "end_ok"]);
    }

    #[tokio::test]
    async fn empty_text_never_reaches_backend() {
        let (client, events) = client_with(Canned::ok(ServiceResponse::default()));

        let err = client.submit(AnalysisInput::text("   ")).await.unwrap_err();
        assert_eq!(err, SubmitError::Validation(ValidationError::EmptyText));
        assert_eq!(client.backend().calls(), 0);
        assert_eq!(client.state(), RequestState::Idle);
        assert!(events.0.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn service_error_fails_without_transcription() {
        let (client, events) = client_with(Canned::ok(ServiceResponse {
            transcription: Some("ignored".into()),
            error: Some("unsupported format".into()),
            ..Default::default()
        }));

        let err = client
            .submit(AnalysisInput::file("clip.xyz", &b"data"[..]))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Error analyzing file: unsupported format");
        assert_eq!(client.state(), RequestState::Failed);
        assert_eq!(*events.0.read().unwrap(), vec!["start", "end_err"]);
    }

    #[tokio::test]
    async fn transport_error_fails() {
        let (client, _) = client_with(Canned::err(TransportError::Request(
            "could not connect to the analysis service".into(),
        )));

        let err = client.submit(AnalysisInput::text("hi")).await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Error analyzing text: could not connect to the analysis service"
        );
        assert_eq!(client.state(), RequestState::Failed);
    }

    #[tokio::test]
    async fn file_without_transcription_shows_empty_panel() {
        let (client, _) = client_with(Canned::ok(ServiceResponse {
            result: json!({"language": "Hindi", "confidence": 0.8}),
            ..Default::default()
        }));

        let model = client
            .submit(AnalysisInput::file("talk.mp3", &b"ID3"[..]))
            .await
            .unwrap();
        assert_eq!(model.transcription, Transcription::Shown(String::new()));
        assert_eq!(model.time, "-");
    }

    #[tokio::test]
    async fn undecodable_result_still_succeeds() {
        let (client, _) = client_with(Canned::ok(ServiceResponse {
            result: json!("{not json"),
            ..Default::default()
        }));

        let model = client.submit(AnalysisInput::text("hola")).await.unwrap();
        assert_eq!(model.translation, "Error parsing result. Raw: {not json");
        assert_eq!(client.state(), RequestState::Succeeded);
    }

    #[tokio::test]
    async fn client_can_be_reused_after_failure() {
        let (client, events) = client_with(Canned::err(TransportError::Status {
            status: 500,
            detail: String::new(),
        }));

        for _ in 0..2 {
            let err = client.submit(AnalysisInput::text("again")).await.unwrap_err();
            assert!(matches!(err, SubmitError::Transport { .. }));
        }
        assert_eq!(client.backend().calls(), 2);
        assert_eq!(
            *events.0.read().unwrap(),
            vec!["start", "end_err", "start", "end_err"]
        );
    }
}
