use depthgate::gate::{GatingState, ResponseStrategy};
use depthgate::observability::ObserverEvent;
use depthgate::TurnRequest;

use super::engine_harness::{GENUINE, default_harness};

#[tokio::test]
async fn exact_repeat_is_flagged_on_second_occurrence() {
    let h = default_harness();
    let first = h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    assert!(!first.repetition_flag);

    let second = h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    assert!(second.repetition_flag);
    // One cycle is below the default pivot threshold of two.
    assert_ne!(second.strategy, Some(ResponseStrategy::PivotToEscalation));
}

#[tokio::test]
async fn paraphrase_is_flagged_and_unrelated_is_not() {
    let h = default_harness();
    h.engine
        .process_turn(TurnRequest::new(
            "k",
            "I keep wondering whether I should quit my job and go back to school",
        ))
        .await;

    let paraphrase = h
        .engine
        .process_turn(TurnRequest::new(
            "k",
            "I keep wondering whether I should quit my job and go back to college",
        ))
        .await;
    assert!(paraphrase.repetition_flag);

    let unrelated = h
        .engine
        .process_turn(TurnRequest::new("k", "Yesterday we drove to the coast and watched the sunset"))
        .await;
    assert!(!unrelated.repetition_flag);
}

#[tokio::test]
async fn looping_conversation_pivots_without_failsafe() {
    let h = default_harness();
    for _ in 0..2 {
        h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    }
    let third = h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;

    assert!(third.repetition_flag);
    assert_eq!(third.gating_state, GatingState::Warn);
    assert_eq!(third.strategy, Some(ResponseStrategy::PivotToEscalation));
    let block = third.instruction_block.unwrap();
    assert!(block.contains("repetition_cycles: 2"));
    assert!(block.contains("pivot_to_escalation"));

    let pivots = h
        .observer
        .count(|e| matches!(e, ObserverEvent::PivotRecommended { .. }));
    assert_eq!(pivots, 1);
}

#[tokio::test]
async fn repetition_is_tracked_per_key() {
    let h = default_harness();
    h.engine.process_turn(TurnRequest::new("a", GENUINE)).await;
    let other = h.engine.process_turn(TurnRequest::new("b", GENUINE)).await;
    assert!(!other.repetition_flag);
}
