use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use ai_llm_service::{
    AiLlmError, FinishReason, GeminiConfig, GeminiService, ProviderError, TextGenerator,
};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Mock {
    hits: Arc<AtomicUsize>,
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

fn service(endpoint: String, max_retries: u32, timeout_secs: u64) -> GeminiService {
    GeminiService::new(GeminiConfig {
        endpoint,
        api_key: Some("test-key".into()),
        timeout_secs,
        max_retries,
        retry_backoff_ms: 10,
        ..GeminiConfig::default()
    })
    .unwrap()
}

async fn echo_prompt(
    State(mock): State<Mock>,
    Query(q): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    if q.get("key").map(String::as_str) != Some("test-key") {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "bad key" })));
    }
    let prompt = body["contents"][0]["parts"][0]["text"].clone();
    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": prompt }], "role": "model" },
                "finishReason": "STOP"
            }]
        })),
    )
}

#[tokio::test]
async fn sends_prompt_with_key_and_returns_first_part() {
    let mock = Mock::default();
    let app = Router::new()
        .route("/v1/models/gemini-1.5-pro:generateContent", post(echo_prompt))
        .with_state(mock.clone());
    let svc = service(spawn(app).await, 0, 5);

    let g = svc.generate("What is Tulsi?").await.unwrap();

    assert_eq!(g.text, "What is Tulsi?");
    assert_eq!(g.finish_reason, Some(FinishReason::Stop));
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_candidates_is_reported_as_provider_error() {
    let app = Router::new().route(
        "/v1/models/gemini-1.5-pro:generateContent",
        post(|| async { Json(json!({ "candidates": [] })) }),
    );
    let svc = service(spawn(app).await, 0, 5);

    let err = svc.generate("q").await.unwrap_err();
    assert!(matches!(
        err,
        AiLlmError::Provider(ProviderError::EmptyCandidates { .. })
    ));
}

#[tokio::test]
async fn client_errors_are_not_retried_and_hide_the_key() {
    let mock = Mock::default();
    let app = Router::new()
        .route(
            "/v1/models/gemini-1.5-pro:generateContent",
            post(|State(mock): State<Mock>| async move {
                mock.hits.fetch_add(1, Ordering::SeqCst);
                (StatusCode::BAD_REQUEST, "API key not valid")
            }),
        )
        .with_state(mock.clone());
    let svc = service(spawn(app).await, 3, 5);

    let err = svc.generate("q").await.unwrap_err();
    match &err {
        AiLlmError::Provider(ProviderError::HttpStatus(http)) => {
            assert_eq!(http.status, StatusCode::BAD_REQUEST);
            assert_eq!(http.snippet, "API key not valid");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.to_string().contains("test-key"));
    assert_eq!(mock.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let mock = Mock::default();
    let app = Router::new()
        .route(
            "/v1/models/gemini-1.5-pro:generateContent",
            post(|State(mock): State<Mock>| async move {
                let n = mock.hits.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "busy" })))
                } else {
                    (
                        StatusCode::OK,
                        Json(json!({ "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }] })),
                    )
                }
            }),
        )
        .with_state(mock.clone());
    let svc = service(spawn(app).await, 2, 5);

    let g = svc.generate("q").await.unwrap();
    assert_eq!(g.text, "ok");
    assert_eq!(mock.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let app = Router::new().route(
        "/v1/models/gemini-1.5-pro:generateContent",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "candidates": [] }))
        }),
    );
    let svc = service(spawn(app).await, 2, 1);

    let err = svc.generate("q").await.unwrap_err();
    assert!(matches!(err, AiLlmError::Timeout(d) if d == Duration::from_secs(1)));
}
