use depthgate::clock::Clock;
use chrono::TimeDelta;
use depthgate::gate::{Classification, GatingState, ResponseStrategy};
use depthgate::scoring::ScoreSource;
use depthgate::store::ContextStore;
use depthgate::TurnRequest;

use super::engine_harness::{GENUINE, default_harness};

#[tokio::test]
async fn genuine_turn_updates_depth_and_continues() {
    let h = default_harness();
    let outcome = h.engine.process_turn(TurnRequest::new("anon-1", GENUINE)).await;

    assert!(outcome.allowed);
    assert_eq!(outcome.remaining, 29);
    assert_eq!(outcome.gating_state, GatingState::Continue);
    assert_eq!(outcome.strategy, Some(ResponseStrategy::Deepen));
    assert_eq!(outcome.classification, Some(Classification::Genuine));
    assert!(!outcome.repetition_flag);

    let score = outcome.score.unwrap();
    assert_eq!(score.source, ScoreSource::Heuristic);
    let state = outcome.depth_state.unwrap();
    // From zero depth the first update moves up_rate of the way to the score.
    assert!((state.value - 0.5 * score.value).abs() < 1e-12);
    assert!((outcome.depth - state.value).abs() < f64::EPSILON);
}

#[tokio::test]
async fn depth_state_is_carried_by_the_caller() {
    let h = default_harness();
    let first = h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    let carried = first.depth_state.unwrap();

    h.clock.advance(TimeDelta::seconds(5));
    let second = h
        .engine
        .process_turn(TurnRequest::new("k", "My brother and I stopped talking after the wedding and I miss him").with_depth(carried))
        .await;
    let state = second.depth_state.unwrap();
    assert_eq!(state.last_updated, h.clock.now());
    assert!((0.0..=1.0).contains(&state.value));
}

#[tokio::test]
async fn empty_message_counts_as_invalid_format() {
    let h = default_harness();
    let outcome = h.engine.process_turn(TurnRequest::new("k", "   ")).await;
    assert!(outcome.allowed);
    assert_eq!(outcome.classification, Some(Classification::InvalidFormat));
    assert_eq!(outcome.gating_state, GatingState::Continue);
}

#[tokio::test]
async fn identity_fields_are_captured_into_the_instruction_block() {
    let h = default_harness();
    let outcome = h
        .engine
        .process_turn(TurnRequest::new(
            "k",
            "Hi, my name is Ada and you can email me at ada@example.com about the workshop",
        ))
        .await;
    let block = outcome.instruction_block.unwrap();
    assert!(block.contains("email=ada@example.com"));
    assert!(block.contains("name=Ada"));

    let ctx = h.store.snapshot("k").unwrap();
    assert_eq!(ctx.captured_fields.get("name").map(String::as_str), Some("Ada"));
}

#[tokio::test]
async fn malformed_email_is_invalid_format() {
    let h = default_harness();
    let outcome = h
        .engine
        .process_turn(TurnRequest::new("k", "sure, my email is ada@@example"))
        .await;
    assert_eq!(outcome.classification, Some(Classification::InvalidFormat));
    let ctx = h.store.snapshot("k").unwrap();
    assert_eq!(ctx.invalid_format_count, 1);
    assert!(!ctx.captured_fields.contains_key("email"));
}

#[tokio::test]
async fn history_is_bounded_by_config() {
    let h = default_harness();
    for i in 0..25 {
        h.engine
            .process_turn(TurnRequest::new("k", format!("message number {i} about my week")))
            .await;
    }
    let ctx = h.store.snapshot("k").unwrap();
    assert_eq!(ctx.message_history.len(), 20);
    assert_eq!(
        ctx.message_history.back().map(String::as_str),
        Some("message number 24 about my week")
    );
}

#[tokio::test]
async fn outcome_serializes_with_snake_case_fields() {
    let h = default_harness();
    let outcome = h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["allowed"], true);
    assert_eq!(json["gating_state"], "continue");
    assert_eq!(json["repetition_flag"], false);
    assert_eq!(json["classification"], "genuine");
    assert_eq!(json["score"]["source"], "heuristic");
    assert!(json.get("instruction_block").is_none());
    assert!(json["reset_at"].is_string());
}

#[tokio::test]
async fn sweep_evicts_idle_sessions() {
    let h = default_harness();
    h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    assert_eq!(h.store.len(), 1);

    h.clock.advance(TimeDelta::minutes(10));
    let report = h.engine.sweep();
    assert_eq!(report.contexts_evicted, 0);
    assert_eq!(report.active_contexts, 1);

    h.clock.advance(TimeDelta::hours(2));
    let report = h.engine.sweep();
    assert_eq!(report.contexts_evicted, 1);
    assert_eq!(report.windows_evicted, 1);
    assert!(h.store.is_empty());
}
