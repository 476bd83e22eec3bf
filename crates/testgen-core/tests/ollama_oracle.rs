use serde_json::json;
use testgen_core::{GenerationError, OllamaOracle, Oracle, TestGenerator};
use testgen_test_utils::{TempWorkspace, DIVIDE_SOURCE, UNFENCED_TEST};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn sends_chat_request_and_reads_message_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "qwen2.5-coder",
            "stream": false,
            "messages": [{"role": "user", "content": "write a test"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "qwen2.5-coder",
            "message": {"role": "assistant", "content": "```python\nassert True\n```"},
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let oracle = OllamaOracle::new(server.uri(), "qwen2.5-coder");
    let reply = oracle.complete("write a test").await.unwrap();

    assert_eq!(reply, "```python\nassert True\n```");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model 'nope' not found"))
        .mount(&server)
        .await;

    let oracle = OllamaOracle::new(server.uri(), "nope");
    let err = oracle.complete("p").await.unwrap_err();

    match err {
        GenerationError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": 1})))
        .mount(&server)
        .await;

    let oracle = OllamaOracle::new(server.uri(), "qwen2.5-coder");
    let err = oracle.complete("p").await.unwrap_err();

    assert!(matches!(err, GenerationError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // Bind then drop a listener so the port is very likely closed.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let oracle = OllamaOracle::new(uri, "qwen2.5-coder");
    let err = oracle.complete("p").await.unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn ollama_generator_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": format!("```python\n{}\n```", UNFENCED_TEST)}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let workspace = TempWorkspace::new();
    let config = workspace.config().with_endpoint(server.uri());
    let generator = TestGenerator::ollama(config);

    generator.run(DIVIDE_SOURCE).await.unwrap();

    assert_eq!(workspace.read_output(), UNFENCED_TEST);
}
