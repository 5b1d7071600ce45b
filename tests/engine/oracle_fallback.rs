use std::time::{Duration, Instant};

use depthgate::gate::{Classification, GatingState};
use depthgate::observability::ObserverEvent;
use depthgate::scoring::{ScoreSource, Tier};
use depthgate::TurnRequest;

use super::engine_harness::{AMBIGUOUS, Answer, ScriptedOracle, fast_oracle_config, harness};

#[tokio::test]
async fn oracle_score_and_classification_are_used_when_available() {
    let oracle = ScriptedOracle::new(Answer::Value(0.9), Answer::Value(Classification::Genuine));
    let h = harness(fast_oracle_config(), Some(oracle.clone()));

    let outcome = h.engine.process_turn(TurnRequest::new("k", AMBIGUOUS)).await;
    let score = outcome.score.unwrap();
    assert_eq!(score.source, ScoreSource::Oracle);
    assert!((score.value - 0.9).abs() < f64::EPSILON);
    assert!((outcome.depth - 0.45).abs() < 1e-12);
    assert_eq!(outcome.classification, Some(Classification::Genuine));
    assert_eq!(oracle.score_calls(), 1);
    assert_eq!(oracle.classify_calls(), 1);
}

#[tokio::test]
async fn oracle_classification_overrides_heuristic() {
    let oracle = ScriptedOracle::new(Answer::Value(0.5), Answer::Value(Classification::Spam));
    let h = harness(fast_oracle_config(), Some(oracle));
    let outcome = h.engine.process_turn(TurnRequest::new("k", AMBIGUOUS)).await;
    assert_eq!(outcome.classification, Some(Classification::Spam));
    assert_eq!(outcome.gating_state, GatingState::Failsafe);
}

#[tokio::test]
async fn failing_oracle_degrades_to_heuristics() {
    let oracle = ScriptedOracle::new(Answer::Fail, Answer::Fail);
    let h = harness(fast_oracle_config(), Some(oracle));

    let outcome = h.engine.process_turn(TurnRequest::new("k", AMBIGUOUS)).await;
    assert!(outcome.allowed);
    assert_eq!(outcome.score.unwrap().source, ScoreSource::HeuristicFallback);
    assert_eq!(outcome.classification, Some(Classification::HonestAttempt));

    let stages: Vec<&'static str> = h
        .observer
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ObserverEvent::OracleFallback { stage, .. } => Some(stage),
            _ => None,
        })
        .collect();
    assert_eq!(stages, vec!["score", "classify"]);
}

#[tokio::test]
async fn hanging_oracle_is_bounded_by_the_timeout() {
    let oracle = ScriptedOracle::new(Answer::Hang, Answer::Hang);
    let h = harness(fast_oracle_config(), Some(oracle));

    let started = Instant::now();
    let outcome = h.engine.process_turn(TurnRequest::new("k", AMBIGUOUS)).await;
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(outcome.score.unwrap().source, ScoreSource::HeuristicFallback);
    assert!(outcome.classification.is_some());
}

#[tokio::test]
async fn tier_gate_keeps_oracle_out_of_anonymous_turns() {
    let mut config = fast_oracle_config();
    config.scorer.escalation_tiers = vec![Tier::Premium];
    let oracle = ScriptedOracle::new(Answer::Value(0.9), Answer::Value(Classification::Genuine));
    let h = harness(config, Some(oracle.clone()));

    let anonymous = h.engine.process_turn(TurnRequest::new("a", AMBIGUOUS)).await;
    assert_eq!(anonymous.score.unwrap().source, ScoreSource::Heuristic);
    assert_eq!(oracle.score_calls(), 0);
    assert_eq!(oracle.classify_calls(), 0);

    let premium = h
        .engine
        .process_turn(TurnRequest::new("p", AMBIGUOUS).with_tier(Tier::Premium))
        .await;
    assert_eq!(premium.score.unwrap().source, ScoreSource::Oracle);
    assert_eq!(oracle.classify_calls(), 1);
}

#[tokio::test]
async fn classification_oracle_can_be_disabled() {
    let mut config = fast_oracle_config();
    config.gate.oracle_classification = false;
    let oracle = ScriptedOracle::new(Answer::Value(0.9), Answer::Value(Classification::Spam));
    let h = harness(config, Some(oracle.clone()));

    let outcome = h.engine.process_turn(TurnRequest::new("k", AMBIGUOUS)).await;
    assert_eq!(outcome.classification, Some(Classification::HonestAttempt));
    assert_eq!(oracle.classify_calls(), 0);
    assert_eq!(oracle.score_calls(), 1);
}
