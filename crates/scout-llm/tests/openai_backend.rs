//! OpenAiBackend against a local stub provider.

use pretty_assertions::assert_eq;
use scout_llm::{
    DescriptionService, DescriptionSettings, LlmBackend, LlmError, LlmRequest, Message, OpenAiBackend,
};
use scout_test_utils::{chat_completion, unreachable_url, Method, StatusCode, StubServer};
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn backend(base_url: String) -> OpenAiBackend {
    OpenAiBackend::new(SecretString::from("sk-test-key"), "gpt-4").with_base_url(base_url)
}

#[tokio::test]
async fn test_complete_posts_openai_shaped_request() {
    let stub = StubServer::json(StatusCode::OK, chat_completion("Hi there.")).await;

    let resp = backend(stub.base_url())
        .complete(LlmRequest {
            messages: vec![Message::user("hello")],
            model: None,
            max_tokens: Some(60),
            temperature: Some(0.5),
        })
        .await
        .unwrap();

    assert_eq!(resp.content.as_deref(), Some("Hi there."));
    assert_eq!(resp.model, "gpt-4-0613");
    assert_eq!(resp.completion_tokens, 17);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path, "/v1/chat/completions");
    assert_eq!(req.header("authorization"), Some("Bearer sk-test-key"));
    assert_eq!(
        req.json(),
        json!({
            "model": "gpt-4",
            "messages": [{ "role": "user", "content": "hello" }],
            "max_tokens": 60,
            "temperature": 0.5
        })
    );
}

#[tokio::test]
async fn test_error_status_becomes_api_error() {
    let stub = StubServer::json(
        StatusCode::UNAUTHORIZED,
        json!({ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" } }),
    )
    .await;

    let err = backend(stub.base_url())
        .complete(LlmRequest { messages: vec![Message::user("x")], model: None, max_tokens: None, temperature: None })
        .await
        .unwrap_err();

    match err {
        LlmError::ApiError { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_transport_error() {
    let stub = StubServer::spawn(StatusCode::OK, "text/html", "<html>gateway</html>").await;
    let err = backend(stub.base_url())
        .complete(LlmRequest { messages: vec![Message::user("x")], model: None, max_tokens: None, temperature: None })
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Http(_)));
}

#[tokio::test]
async fn test_unreachable_provider_is_http_error() {
    let err = backend(unreachable_url().await)
        .complete(LlmRequest { messages: vec![Message::user("x")], model: None, max_tokens: None, temperature: None })
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Http(_)));
}

#[tokio::test]
async fn test_slow_provider_hits_configured_timeout() {
    let stub = StubServer::delayed(Duration::from_secs(5), StatusCode::OK, chat_completion("late")).await;
    let backend = backend(stub.base_url()).with_timeout(Duration::from_millis(200)).unwrap();

    let err = backend
        .complete(LlmRequest { messages: vec![Message::user("x")], model: None, max_tokens: None, temperature: None })
        .await
        .unwrap_err();

    match err {
        LlmError::Http(e) => assert!(e.is_timeout(), "expected timeout, got {e}"),
        other => panic!("expected Http timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_description_service_end_to_end() {
    let stub = StubServer::json(StatusCode::OK, chat_completion("\n The Blue Jay is a loud, clever songbird. ")).await;
    let service = DescriptionService::new(Arc::new(backend(stub.base_url())), DescriptionSettings::default());

    let text = service.describe("Blue Jay").await.unwrap();
    assert_eq!(text, "The Blue Jay is a loud, clever songbird.");

    let sent = stub.requests()[0].json();
    assert_eq!(
        sent["messages"][0]["content"],
        "Give me a short and friendly one-sentence description of the bird species \"Blue Jay\"."
    );
    assert_eq!(sent["max_tokens"], 60);
    assert_eq!(sent["model"], "gpt-4");
}
