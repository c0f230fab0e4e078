//! The Gemini client against a local fake of the `generateContent` endpoint.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ::common::ai::{FieldExtractor, GeminiExtractor};
use ::common::config::AiConfig;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

struct FakeGemini {
    calls: AtomicUsize,
    /// Status returned for the first `failures` calls.
    failure: StatusCode,
    failures: usize,
    reply: String,
    seen_key: Mutex<Option<String>>,
    seen_prompt: Mutex<Option<String>>,
}

async fn generate(
    State(fake): State<Arc<FakeGemini>>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let n = fake.calls.fetch_add(1, Ordering::SeqCst);
    *fake.seen_key.lock().unwrap() = query.get("key").cloned();
    *fake.seen_prompt.lock().unwrap() = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .map(str::to_string);

    if n < fake.failures {
        return (fake.failure, Json(json!({"error": "unavailable"})));
    }
    (
        StatusCode::OK,
        Json(json!({"candidates": [{"content": {"parts": [{"text": fake.reply}]}}]})),
    )
}

async fn spawn_fake(failure: StatusCode, failures: usize, reply: &str) -> (String, Arc<FakeGemini>) {
    let fake = Arc::new(FakeGemini {
        calls: AtomicUsize::new(0),
        failure,
        failures,
        reply: reply.to_string(),
        seen_key: Mutex::new(None),
        seen_prompt: Mutex::new(None),
    });
    let app = Router::new()
        .route("/models/test/generate", post(generate))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake AI server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (
        format!("http://{addr}/models/test/generate"),
        fake,
    )
}

fn config(endpoint: String, max_retries: u8) -> AiConfig {
    AiConfig {
        endpoint,
        api_key: Some("test-key".into()),
        timeout_secs: 5,
        max_retries,
        retry_base_ms: 1,
        retry_max_ms: 5,
        ..AiConfig::default()
    }
}

#[tokio::test]
async fn sends_prompt_and_key_and_parses_fenced_reply() {
    let (endpoint, fake) = spawn_fake(
        StatusCode::OK,
        0,
        "```json\n{\"firstName\": \"Asha\", \"skills\": []}\n```",
    )
    .await;
    let extractor = GeminiExtractor::new(&config(endpoint, 0), "test-key").unwrap();

    let value = extractor.extract("Asha Rao\nGo developer").await;

    assert_eq!(value, json!({"firstName": "Asha", "skills": []}));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fake.seen_key.lock().unwrap().as_deref(), Some("test-key"));
    let prompt = fake.seen_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.ends_with("Asha Rao\nGo developer"));
    assert!(prompt.contains("workExperience"));
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let (endpoint, fake) =
        spawn_fake(StatusCode::SERVICE_UNAVAILABLE, 2, "{\"firstName\": \"Asha\"}").await;
    let extractor = GeminiExtractor::new(&config(endpoint, 2), "test-key").unwrap();

    let value = extractor.extract("Asha Rao").await;

    assert_eq!(value, json!({"firstName": "Asha"}));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn gives_up_after_configured_retries() {
    let (endpoint, fake) =
        spawn_fake(StatusCode::TOO_MANY_REQUESTS, 10, "{\"firstName\": \"Asha\"}").await;
    let extractor = GeminiExtractor::new(&config(endpoint, 1), "test-key").unwrap();

    assert_eq!(extractor.extract("Asha Rao").await, json!({}));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let (endpoint, fake) = spawn_fake(StatusCode::BAD_REQUEST, 10, "{}").await;
    let extractor = GeminiExtractor::new(&config(endpoint, 3), "test-key").unwrap();

    assert_eq!(extractor.extract("Asha Rao").await, json!({}));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_object_reply_yields_empty_object() {
    let (endpoint, _fake) = spawn_fake(StatusCode::OK, 0, "[\"not\", \"an\", \"object\"]").await;
    let extractor = GeminiExtractor::new(&config(endpoint, 0), "test-key").unwrap();

    assert_eq!(extractor.extract("Asha Rao").await, json!({}));
}
