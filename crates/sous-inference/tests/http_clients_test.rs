//! Wire-level tests for the generation and embedding clients.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sous_core::{EmbeddingBackend, GenerationBackend};
use sous_inference::{
    EmbeddingConfig, EmbeddingMode, GenerationConfig, HttpEmbeddingClient, HttpGenerationClient,
    RetryPolicy,
};

fn generation_config(base_url: String, attempts: u32) -> GenerationConfig {
    GenerationConfig {
        base_url,
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
        timeout_secs: 5,
        retry: RetryPolicy::immediate(attempts),
    }
}

fn embedding_config(base_url: String, attempts: u32) -> EmbeddingConfig {
    EmbeddingConfig {
        base_url,
        api_key: "test-key".to_string(),
        model: "test-embed".to_string(),
        dimension: 3,
        timeout_secs: 5,
        retry: RetryPolicy::immediate(attempts),
        mode: EmbeddingMode::Live,
    }
}

fn chat_body(content: &str) -> serde_json::Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}

#[tokio::test]
async fn test_generation_success_sends_bearer_auth_and_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(
            json!({"model": "test-model", "stream": false}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("a recipe")))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpGenerationClient::new(generation_config(server.uri(), 3)).unwrap();
    let result = client.generate("make me tacos").await.unwrap();
    assert_eq!(result, "a recipe");
}

#[tokio::test]
async fn test_generation_retries_past_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("third time")))
        .mount(&server)
        .await;

    let client = HttpGenerationClient::new(generation_config(server.uri(), 3)).unwrap();
    let result = client.generate("prompt").await.unwrap();
    assert_eq!(result, "third time");
}

#[tokio::test]
async fn test_generation_exhaustion_surfaces_last_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(3)
        .mount(&server)
        .await;

    let client = HttpGenerationClient::new(generation_config(server.uri(), 3)).unwrap();
    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, sous_core::Error::Generation(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_generation_malformed_body_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpGenerationClient::new(generation_config(server.uri(), 2)).unwrap();
    let err = client.generate("prompt").await.unwrap_err();
    assert!(matches!(err, sous_core::Error::Generation(_)));
}

#[tokio::test]
async fn test_embedding_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"model": "test-embed"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [{"embedding": [0.5, 0.25, -1.0]}]})),
        )
        .mount(&server)
        .await;

    let client = HttpEmbeddingClient::new(embedding_config(server.uri(), 3)).unwrap();
    let vector = client.embed("taco description").await.unwrap();
    assert_eq!(vector.as_slice(), &[0.5, 0.25, -1.0]);
}

#[tokio::test]
async fn test_embedding_empty_data_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let client = HttpEmbeddingClient::new(embedding_config(server.uri(), 2)).unwrap();
    let err = client.embed("text").await.unwrap_err();
    assert!(matches!(err, sous_core::Error::Embedding(_)));
    assert!(err.to_string().contains("zero embeddings"));
}

#[tokio::test]
async fn test_embedding_retries_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"embedding": [1.0]}]})),
        )
        .mount(&server)
        .await;

    let client = HttpEmbeddingClient::new(embedding_config(server.uri(), 2)).unwrap();
    let vector = client.embed("text").await.unwrap();
    assert_eq!(vector.as_slice(), &[1.0]);
}

#[tokio::test]
async fn test_bypass_mode_never_touches_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = EmbeddingConfig {
        mode: EmbeddingMode::Bypass,
        ..embedding_config(server.uri(), 3)
    };
    let client = HttpEmbeddingClient::new(config).unwrap();
    let vector = client.embed("anything").await.unwrap();
    assert_eq!(vector.as_slice(), &[0.1, 0.2, 0.3, 0.4, 0.5]);
}
