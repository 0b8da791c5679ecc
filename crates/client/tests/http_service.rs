//! End-to-end tests against a throwaway axum service on 127.0.0.1.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use client::{
    AnalysisClient, ClientConfig, RequestState, SubmitError, TransportError, REQUEST_ID_HEADER,
};
use input::AnalysisInput;
use present::Transcription;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Notify;

#[derive(Debug, Clone, Default)]
struct UploadedPart {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct Recorded {
    hits: AtomicUsize,
    text_bodies: Mutex<Vec<Value>>,
    request_ids: Mutex<Vec<String>>,
    parts: Mutex<Vec<UploadedPart>>,
}

type Shared = Arc<Recorded>;

async fn spawn_service(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: String) -> AnalysisClient {
    AnalysisClient::new(ClientConfig {
        base_url,
        ..Default::default()
    })
    .unwrap()
}

fn remember_request_id(recorded: &Recorded, headers: &HeaderMap) {
    if let Some(id) = headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
        recorded.request_ids.lock().unwrap().push(id.to_string());
    }
}

async fn analyze_text_ok(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded.hits.fetch_add(1, Ordering::SeqCst);
    remember_request_id(&recorded, &headers);
    recorded.text_bodies.lock().unwrap().push(body);
    Json(json!({
        "result": "{\"language\": \"French\", \"confidence\": 0.95, \"translation\": \"Hello\"}",
        "execution_time": 0.42
    }))
}

async fn analyze_file_ok(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Json<Value> {
    recorded.hits.fetch_add(1, Ordering::SeqCst);
    remember_request_id(&recorded, &headers);
    while let Some(field) = multipart.next_field().await.unwrap() {
        let part = UploadedPart {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            bytes: field.bytes().await.unwrap().to_vec(),
        };
        recorded.parts.lock().unwrap().push(part);
    }
    Json(json!({
        "analysis": {"language": "Hindi", "confidence": "87.3%", "summary": "A greeting"},
        "transcription": "namaste duniya",
        "execution_time": 3
    }))
}

async fn analyze_file_rejected(State(recorded): State<Shared>) -> Json<Value> {
    recorded.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({"error": "unsupported format", "transcription": "should not show"}))
}

#[tokio::test]
async fn text_analysis_round_trip() {
    let recorded = Shared::default();
    let router = Router::new()
        .route("/analyze_text", post(analyze_text_ok))
        .with_state(recorded.clone());
    let client = client_for(spawn_service(router).await);

    let model = client
        .submit(AnalysisInput::text("Bonjour"))
        .await
        .unwrap();

    assert_eq!(model.language, "French");
    assert_eq!(model.confidence, "95.0%");
    assert_eq!(model.translation, "Hello");
    assert_eq!(model.time, "0.42s");
    assert_eq!(model.transcription, Transcription::Hidden);
    assert_eq!(client.state(), RequestState::Succeeded);

    assert_eq!(
        *recorded.text_bodies.lock().unwrap(),
        vec![json!({"text": "Bonjour"})]
    );
    let ids = recorded.request_ids.lock().unwrap();
    assert_eq!(ids.len(), 1);
    assert!(uuid::Uuid::parse_str(&ids[0]).is_ok());
}

#[tokio::test]
async fn file_upload_is_multipart_with_single_file_part() {
    let recorded = Shared::default();
    let router = Router::new()
        .route("/analyze_file", post(analyze_file_ok))
        .with_state(recorded.clone());
    let client = client_for(spawn_service(router).await);

    let model = client
        .submit(AnalysisInput::file("greeting.wav", &b"RIFF....WAVE"[..]))
        .await
        .unwrap();

    assert_eq!(model.language, "Hindi");
    assert_eq!(model.confidence, "87.3%");
    assert_eq!(model.translation, "A greeting");
    assert_eq!(model.time, "3s");
    assert_eq!(
        model.transcription,
        Transcription::Shown("namaste duniya".into())
    );

    let parts = recorded.parts.lock().unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].field, "file");
    assert_eq!(parts[0].file_name.as_deref(), Some("greeting.wav"));
    assert!(parts[0]
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("audio/")));
    assert_eq!(parts[0].bytes, b"RIFF....WAVE");
}

#[tokio::test]
async fn large_upload_arrives_intact() {
    let recorded = Shared::default();
    let router = Router::new()
        .route("/analyze_file", post(analyze_file_ok))
        .with_state(recorded.clone())
        .layer(axum::extract::DefaultBodyLimit::disable());
    let client = client_for(spawn_service(router).await);

    let payload: Vec<u8> = (0..1024 * 1024).map(|i| (i % 251) as u8).collect();
    client
        .submit(AnalysisInput::file("lecture.mp3", payload.clone()))
        .await
        .unwrap();

    let parts = recorded.parts.lock().unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].bytes.len(), payload.len());
    assert!(parts[0].bytes == payload);
}

#[tokio::test]
async fn service_error_field_fails_file_analysis() {
    let recorded = Shared::default();
    let router = Router::new()
        .route("/analyze_file", post(analyze_file_rejected))
        .with_state(recorded.clone());
    let client = client_for(spawn_service(router).await);

    let err = client
        .submit(AnalysisInput::file("clip.mov", &b"moov"[..]))
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(),
        "Error analyzing file: unsupported format"
    );
    assert_eq!(client.state(), RequestState::Failed);
    assert_eq!(recorded.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_text_sends_nothing() {
    let recorded = Shared::default();
    let router = Router::new()
        .route("/analyze_text", post(analyze_text_ok))
        .with_state(recorded.clone());
    let client = client_for(spawn_service(router).await);

    let err = client.submit(AnalysisInput::text(" \n ")).await.unwrap_err();

    assert_eq!(err.user_message(), "Please enter some text");
    assert_eq!(recorded.hits.load(Ordering::SeqCst), 0);
    assert_eq!(client.state(), RequestState::Idle);
}

#[tokio::test]
async fn non_success_status_uses_error_body() {
    let router = Router::new().route(
        "/analyze_text",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "text too long"})),
            )
        }),
    );
    let client = client_for(spawn_service(router).await);

    let err = client.submit(AnalysisInput::text("…")).await.unwrap_err();

    assert_eq!(
        err,
        SubmitError::Transport {
            kind: input::InputKind::Text,
            source: TransportError::Status {
                status: 400,
                detail: "text too long".into(),
            },
        }
    );
    assert_eq!(err.user_message(), "Error analyzing text: text too long");
}

#[tokio::test]
async fn non_success_status_without_body() {
    let router = Router::new().route(
        "/analyze_text",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE.into_response() }),
    );
    let client = client_for(spawn_service(router).await);

    let err = client.submit(AnalysisInput::text("hi")).await.unwrap_err();

    assert_eq!(err.user_message(), "Error analyzing text: HTTP 503");
    assert_eq!(client.state(), RequestState::Failed);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client_for(format!("http://{addr}"));

    let err = client.submit(AnalysisInput::text("hi")).await.unwrap_err();

    assert!(matches!(
        err,
        SubmitError::Transport {
            source: TransportError::Request(_),
            ..
        }
    ));
    assert!(err.user_message().starts_with("Error analyzing text: "));
}

#[tokio::test]
async fn overlapping_submit_is_rejected_as_busy() {
    let recorded = Shared::default();
    let release = Arc::new(Notify::new());
    let router = Router::new()
        .route(
            "/analyze_text",
            post({
                let release = release.clone();
                move |State(recorded): State<Shared>| async move {
                    recorded.hits.fetch_add(1, Ordering::SeqCst);
                    release.notified().await;
                    Json(json!({"result": {"language": "German"}}))
                }
            }),
        )
        .with_state(recorded.clone());
    let client = client_for(spawn_service(router).await);

    let first = client.submit(AnalysisInput::text("Guten Tag"));
    let second = async {
        while client.state() != RequestState::InFlight {
            tokio::task::yield_now().await;
        }
        let outcome = client.submit(AnalysisInput::text("Hallo")).await;
        release.notify_one();
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(second.unwrap_err(), SubmitError::Busy);
    assert_eq!(first.unwrap().language, "German");
    assert_eq!(recorded.hits.load(Ordering::SeqCst), 1);
    assert_eq!(client.state(), RequestState::Succeeded);
}
