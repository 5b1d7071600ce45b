use depthgate::clock::Clock;
use std::sync::Arc;

use chrono::TimeDelta;
use depthgate::observability::ObserverEvent;
use depthgate::{Config, TurnRequest};

use super::engine_harness::{GENUINE, harness};

fn limited(limit: u32) -> Config {
    let mut config = Config::default();
    config.admission.limit = limit;
    config.admission.window_secs = 3600;
    config
}

#[tokio::test]
async fn window_admits_limit_then_rejects_then_renews() {
    let h = harness(limited(3), None);
    let start = h.clock.now();

    for expected in [2, 1, 0] {
        let outcome = h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
        assert!(outcome.allowed);
        assert_eq!(outcome.remaining, expected);
        assert_eq!(outcome.limit, 3);
    }

    let rejected = h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    assert!(!rejected.allowed);
    assert_eq!(rejected.remaining, 0);
    assert_eq!(rejected.reset_at, start + TimeDelta::hours(1));
    assert!(rejected.score.is_none());
    assert!(rejected.classification.is_none());
    assert!(rejected.instruction_block.is_none());

    h.clock.advance(TimeDelta::hours(1) + TimeDelta::seconds(1));
    let renewed = h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    assert!(renewed.allowed);
    assert_eq!(renewed.remaining, 2);
}

#[tokio::test]
async fn rejected_turns_do_not_touch_engagement_state() {
    let h = harness(limited(1), None);
    h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    for _ in 0..5 {
        h.engine.process_turn(TurnRequest::new("k", "k")).await;
    }
    let ctx = h.store.snapshot("k").unwrap();
    assert_eq!(ctx.non_engagement_strikes, 0);
    assert_eq!(ctx.message_history.len(), 1);

    let rejections = h
        .observer
        .count(|e| matches!(e, ObserverEvent::AdmissionRejected { .. }));
    assert_eq!(rejections, 5);
}

#[tokio::test]
async fn rejected_turn_reports_projected_depth() {
    let mut config = limited(1);
    config.depth.decay_rate = 0.01;
    let h = harness(config, None);

    let first = h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    let state = first.depth_state.unwrap();

    h.clock.advance(TimeDelta::seconds(10));
    let rejected = h
        .engine
        .process_turn(TurnRequest::new("k", GENUINE).with_depth(state))
        .await;
    assert!(!rejected.allowed);
    assert!(rejected.depth_state.is_none());
    let expected = state.value * (-0.01_f64 * 10.0).exp();
    assert!((rejected.depth - expected).abs() < 1e-9);
}

#[tokio::test]
async fn concurrent_turns_on_one_key_respect_the_limit() {
    let h = harness(limited(10), None);
    let mut tasks = Vec::new();
    for i in 0..40 {
        let engine = Arc::clone(&h.engine);
        tasks.push(tokio::spawn(async move {
            engine
                .process_turn(TurnRequest::new("shared", format!("turn {i} about my day at work")))
                .await
                .allowed
        }));
    }
    let mut admitted = 0;
    for task in tasks {
        if task.await.unwrap() {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 10);

    let ctx = h.store.snapshot("shared").unwrap();
    assert_eq!(ctx.message_history.len(), 10);
}

#[tokio::test]
async fn peek_admission_does_not_consume() {
    let h = harness(limited(2), None);
    assert_eq!(h.engine.peek_admission("k").remaining, 2);
    h.engine.process_turn(TurnRequest::new("k", GENUINE)).await;
    assert_eq!(h.engine.peek_admission("k").remaining, 1);
    assert_eq!(h.engine.peek_admission("k").remaining, 1);
}
