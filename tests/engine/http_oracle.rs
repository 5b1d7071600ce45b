use std::sync::Arc;
use std::time::Duration;

use depthgate::clock::ManualClock;
use depthgate::config::OracleConfig;
use depthgate::error::OracleError;
use depthgate::gate::Classification;
use depthgate::oracle::{HttpOracle, ScoringOracle};
use depthgate::scoring::{ScoreSource, Tier};
use depthgate::store::InMemoryContextStore;
use depthgate::{Config, EngagementEngine, TurnRequest};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::engine_harness::AMBIGUOUS;

fn oracle_config(server: &MockServer) -> OracleConfig {
    OracleConfig {
        enabled: true,
        base_url: server.uri(),
        api_key: Some("sk-test".into()),
        timeout_ms: 500,
        ..OracleConfig::default()
    }
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

#[tokio::test]
async fn score_parses_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(completion("0.82"))
        .expect(1)
        .mount(&server)
        .await;

    let oracle = HttpOracle::new(&oracle_config(&server));
    let score = oracle.score(AMBIGUOUS, Tier::Free).await.unwrap();
    assert!((score - 0.82).abs() < 1e-12);
}

#[tokio::test]
async fn classify_sends_history_and_parses_label() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("earlier turn"))
        .respond_with(completion("Honest attempt"))
        .mount(&server)
        .await;

    let oracle = HttpOracle::new(&oracle_config(&server));
    let history = vec!["earlier turn".to_string()];
    let label = oracle.classify("not sure really", &history).await.unwrap();
    assert_eq!(label, Classification::HonestAttempt);
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let oracle = HttpOracle::new(&oracle_config(&server));
    let err = oracle.score("hello", Tier::Free).await.unwrap_err();
    assert!(matches!(err, OracleError::Status { status: 503, .. }));
}

#[tokio::test]
async fn unparseable_answer_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("quite deep, I would say"))
        .mount(&server)
        .await;

    let oracle = HttpOracle::new(&oracle_config(&server));
    let err = oracle.score("hello", Tier::Free).await.unwrap_err();
    assert!(matches!(err, OracleError::Parse { .. }));
}

#[tokio::test]
async fn slow_endpoint_falls_back_inside_the_engine() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("0.9").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.oracle = OracleConfig {
        timeout_ms: 100,
        ..oracle_config(&server)
    };
    let oracle: Arc<dyn ScoringOracle> = Arc::new(HttpOracle::new(&config.oracle));
    let store = Arc::new(InMemoryContextStore::new(&config.store));
    let engine = EngagementEngine::new(
        config,
        store,
        Some(oracle),
        Arc::new(ManualClock::starting_now()),
    );

    let started = std::time::Instant::now();
    let outcome = engine.process_turn(TurnRequest::new("k", AMBIGUOUS)).await;
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(outcome.score.unwrap().source, ScoreSource::HeuristicFallback);
    assert_eq!(outcome.classification, Some(Classification::HonestAttempt));
}
