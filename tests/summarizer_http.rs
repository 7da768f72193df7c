// tests/summarizer_http.rs
use hot_bot::analyze::{OpenRouterSummarizer, Summarizer};
use hot_bot::config::OpenRouterConfig;
use hot_bot::errors::SummarizationError;
use mockito::Matcher;
use serde_json::json;

fn config_for(server: &mockito::ServerGuard, key: &str) -> OpenRouterConfig {
    let mut cfg = OpenRouterConfig::new(key);
    cfg.endpoint = format!("{}/api/v1/chat/completions", server.url());
    cfg.model = "test/model".to_string();
    cfg
}

#[tokio::test]
async fn posts_bearer_authenticated_chat_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"model": "test/model"})),
            Matcher::Regex(r#""role":"system""#.into()),
            Matcher::Regex(r#""role":"user""#.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"choices": [{"message": {"role": "assistant", "content": "  📱 *REDDIT TRENDING*\n1. Short  "}}]})
                .to_string(),
        )
        .create_async()
        .await;

    let s = OpenRouterSummarizer::new(&config_for(&server, "sk-test")).unwrap();
    let out = s.summarize("📱 *REDDIT TRENDING*\n1. Long", "").await.unwrap();

    mock.assert_async().await;
    assert_eq!(out, "📱 *REDDIT TRENDING*\n1. Short");
}

#[tokio::test]
async fn prompt_carries_both_sections() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("World News Headlines".into()),
            Matcher::Regex("Floods in delta".into()),
        ]))
        .with_status(200)
        .with_body(json!({"choices": [{"message": {"content": "ok"}}]}).to_string())
        .create_async()
        .await;

    let s = OpenRouterSummarizer::new(&config_for(&server, "sk-test")).unwrap();
    s.summarize("", "🌍 *WORLD NEWS*\n1. Floods in delta").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/api/v1/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let s = OpenRouterSummarizer::new(&config_for(&server, "sk-test")).unwrap();
    match s.summarize("a", "b").await {
        Err(SummarizationError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_and_empty_completions_fail() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/api/v1/chat/completions")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;
    let s = OpenRouterSummarizer::new(&config_for(&server, "sk-test")).unwrap();
    assert!(matches!(
        s.summarize("a", "b").await,
        Err(SummarizationError::MalformedResponse(_))
    ));

    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/api/v1/chat/completions")
        .with_status(200)
        .with_body(json!({"choices": [{"message": {"content": "   "}}]}).to_string())
        .create_async()
        .await;
    let s = OpenRouterSummarizer::new(&config_for(&server, "sk-test")).unwrap();
    assert!(matches!(
        s.summarize("a", "b").await,
        Err(SummarizationError::EmptyCompletion)
    ));
}

#[tokio::test]
async fn blank_key_never_hits_the_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let s = OpenRouterSummarizer::new(&config_for(&server, "  ")).unwrap();
    assert!(matches!(
        s.summarize("a", "b").await,
        Err(SummarizationError::MissingCredential)
    ));
    mock.assert_async().await;
}
