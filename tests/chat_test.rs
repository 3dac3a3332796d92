//! Integration tests for the chat-completions client
//!
//! Tests HTTP client behavior using wiremock for request/response mocking.

use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use kaji_agent::config::OpenAiConfig;
use kaji_agent::error::ChatError;
use kaji_agent::openai::{ChatClient, ChatRequest, Role, WireMessage};

/// Create a test client pointing to the mock server
fn create_test_client(base_url: &str) -> ChatClient {
    let config = OpenAiConfig {
        api_key: "test-api-key".to_string(),
        base_url: base_url.to_string(),
        model: "gpt-4o-mini".to_string(),
        timeout_ms: 5000,
    };
    ChatClient::new(&config).expect("Failed to create client")
}

fn user_message(content: &str) -> WireMessage {
    WireMessage {
        role: Role::User,
        content: content.to_string(),
        name: None,
        tool_call_id: None,
        tool_calls: None,
    }
}

#[tokio::test]
async fn test_successful_plain_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "content": "こんにちは！", "tool_calls": null },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let request = ChatRequest::new("gpt-4o-mini", vec![user_message("こんにちは")]);
    let message = client.chat(&request).await.expect("chat should succeed");

    assert_eq!(message.content.as_deref(), Some("こんにちは！"));
    assert!(message.requested_calls().is_empty());
}

#[tokio::test]
async fn test_completion_with_tool_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "add_todo",
                            "arguments": "{\"text\":\"牛乳を買う\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let request = ChatRequest::new("gpt-4o-mini", vec![user_message("牛乳を買っておいて")]);
    let message = client.chat(&request).await.expect("chat should succeed");

    let calls = message.requested_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_abc");
    assert_eq!(calls[0].function.name, "add_todo");
    assert_eq!(calls[0].function.arguments, "{\"text\":\"牛乳を買う\"}");
}

#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let request = ChatRequest::new("gpt-4o-mini", vec![user_message("hi")]);
    let result = client.chat(&request).await;

    match result {
        Err(ChatError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert!(message.contains("invalid api key"));
        }
        other => panic!("expected Api error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_missing_choices_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let request = ChatRequest::new("gpt-4o-mini", vec![user_message("hi")]);
    let result = client.chat(&request).await;

    assert!(matches!(result, Err(ChatError::InvalidResponse { .. })));
}

#[tokio::test]
async fn test_no_retry_on_failure() {
    let mock_server = MockServer::start().await;

    // Exactly one request must arrive even when it fails.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let request = ChatRequest::new("gpt-4o-mini", vec![user_message("hi")]);
    let result = client.chat(&request).await;

    assert!(matches!(result, Err(ChatError::Api { status: 500, .. })));
}
