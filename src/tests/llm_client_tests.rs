use mockito::{ Matcher, Server };

use crate::implementations::config::{ ApiConfig, OracleCredentials };
use crate::implementations::llm_client::LlmOracle;
use crate::models::conversation::ChatMessage;
use crate::traits::oracle::{ OracleError, TextOracle };

use super::support::setup;

fn oracle_for(server: &Server, path: &str, provider: &str) -> LlmOracle {
    let config = ApiConfig {
        provider: provider.to_string(),
        api_endpoint: Some(format!("{}{}", server.url(), path)),
        timeout_secs: Some(5),
        ..Default::default()
    };
    let credentials = OracleCredentials {
        provider: provider.to_string(),
        api_key: "test-api-key".to_string(),
    };
    LlmOracle::new(&config, credentials, None).expect("client should build")
}

fn conversation() -> Vec<ChatMessage> {
    vec![ChatMessage::system("You are a Java code generation assistant."), ChatMessage::user("Migrate Member")]
}

#[tokio::test]
async fn openai_request_shape_and_reply() {
    setup();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-api-key")
        .match_header("content-type", "application/json")
        .match_body(
            Matcher::PartialJson(
                serde_json::json!({
                "model": "gpt-4",
                "messages": [
                    { "role": "system", "content": "You are a Java code generation assistant." },
                    { "role": "user", "content": "Migrate Member" }
                ]
            })
            )
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "public class Member {}" } }]
            }).to_string()
        )
        .create_async().await;

    let oracle = oracle_for(&server, "/v1/chat/completions", "openai");
    let reply = oracle.generate(&conversation()).await.expect("call should succeed");

    assert_eq!(reply, "public class Member {}");
    assert_eq!(oracle.model(), "gpt-4");
    mock.assert_async().await;
}

#[tokio::test]
async fn anthropic_request_moves_system_prompt_out_of_turns() {
    setup();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-api-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(
            Matcher::PartialJson(
                serde_json::json!({
                "system": "You are a Java code generation assistant.",
                "messages": [{ "role": "user", "content": "Migrate Member" }]
            })
            )
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "content": [{ "type": "text", "text": "public class Member {}" }]
            }).to_string()
        )
        .create_async().await;

    let oracle = oracle_for(&server, "/v1/messages", "anthropic");
    let reply = oracle.generate(&conversation()).await.expect("call should succeed");

    assert_eq!(reply, "public class Member {}");
    assert_eq!(oracle.model(), "claude-3-sonnet-20240229");
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_an_http_error() {
    setup();
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_body("rate limited")
        .create_async().await;

    let oracle = oracle_for(&server, "/v1/chat/completions", "openai");
    let err = oracle.generate(&conversation()).await.unwrap_err();

    assert!(matches!(err, OracleError::HttpError { status: 429, ref message } if message == "rate limited"));
}

#[tokio::test]
async fn empty_choices_is_an_api_error() {
    setup();
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("{\"choices\": []}")
        .create_async().await;

    let oracle = oracle_for(&server, "/v1/chat/completions", "openai");
    assert!(matches!(oracle.generate(&conversation()).await, Err(OracleError::ApiError(_))));
}
