//! HTTP-level tests for the vision backends, against wiremock stubs.

use mcp_vision_core::backend::{
    GeminiBackend, OpenRouterBackend, VisionBackend, VisionError, VisionRequest,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IMAGE_URL: &str = "data:image/png;base64,aGVsbG8=";

fn request<'a>() -> VisionRequest<'a> {
    VisionRequest {
        system: "You are a UI expert.",
        prompt: "Review this screenshot.",
        image_data_url: IMAGE_URL,
        max_tokens: 2000,
    }
}

#[tokio::test]
async fn openrouter_sends_chat_completion_and_extracts_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 2000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Looks clean overall."}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = OpenRouterBackend::new(
        "test-key".to_string(),
        "test-model".to_string(),
        server.uri(),
    );

    let text = backend.analyze_image(&request()).await.unwrap();
    assert_eq!(text, "Looks clean overall.");
}

#[tokio::test]
async fn openrouter_image_part_carries_the_data_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "You are a UI expert."},
                {"role": "user", "content": [
                    {"type": "text", "text": "Review this screenshot."},
                    {"type": "image_url", "image_url": {"url": IMAGE_URL, "detail": "high"}}
                ]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend =
        OpenRouterBackend::new("k".to_string(), "m".to_string(), server.uri());

    backend.analyze_image(&request()).await.unwrap();
}

#[tokio::test]
async fn openrouter_non_success_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let backend =
        OpenRouterBackend::new("k".to_string(), "m".to_string(), server.uri());

    let err = backend.analyze_image(&request()).await.unwrap_err();
    match err {
        VisionError::Api { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("rate limited"));
        }
        other => panic!("expected Api error, got {:?}", other.to_string()),
    }
}

#[tokio::test]
async fn openrouter_empty_content_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": ""}}]
        })))
        .mount(&server)
        .await;

    let backend =
        OpenRouterBackend::new("k".to_string(), "m".to_string(), server.uri());

    let err = backend.analyze_image(&request()).await.unwrap_err();
    assert!(matches!(err, VisionError::EmptyResponse));
}

#[tokio::test]
async fn gemini_splits_the_data_url_and_joins_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "gem-key"))
        .and(body_partial_json(json!({
            "contents": [
                {"role": "user", "parts": [
                    {"text": "Review this screenshot."},
                    {"inline_data": {"mime_type": "image/png", "data": "aGVsbG8="}}
                ]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Part one"}, {"text": " and two"}]}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = GeminiBackend::new(
        "gem-key".to_string(),
        "gemini-2.0-flash".to_string(),
        server.uri(),
    );

    let text = backend.analyze_image(&request()).await.unwrap();
    assert_eq!(text, "Part one and two");
}

#[tokio::test]
async fn gemini_rejects_a_bare_base64_image() {
    // Never hits the network: the data URL split fails first.
    let backend = GeminiBackend::new(
        "k".to_string(),
        "gemini-2.0-flash".to_string(),
        "http://127.0.0.1:1".to_string(),
    );

    let req = VisionRequest {
        image_data_url: "aGVsbG8=",
        ..request()
    };

    let err = backend.analyze_image(&req).await.unwrap_err();
    assert!(matches!(err, VisionError::BadImage));
}

#[tokio::test]
async fn missing_api_key_is_a_deterministic_error() {
    // No other test in this file reads the real env var.
    std::env::remove_var("OPENROUTER_API_KEY");

    let err = OpenRouterBackend::from_env(None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "OPENROUTER_API_KEY environment variable not set. Set your API key to enable vision analysis."
    );
}

#[tokio::test]
async fn gemini_no_candidates_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let backend = GeminiBackend::new(
        "k".to_string(),
        "gemini-2.0-flash".to_string(),
        server.uri(),
    );

    let err = backend.analyze_image(&request()).await.unwrap_err();
    assert!(matches!(err, VisionError::EmptyResponse));
}
