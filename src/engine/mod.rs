//! Per-turn pipeline: admission, context lease, repetition, scoring, depth,
//! classification and gating.

mod types;

pub use types::{SweepReport, TurnOutcome, TurnRequest};

use crate::admission::{AdmissionController, AdmissionDecision};
use crate::clock::Clock;
use crate::config::Config;
use crate::depth::{DepthEngine, DepthState};
use crate::gate::{
    Classification, EngagementGate, GatingDecision, GatingState, capture_identity,
    classify_heuristic,
};
use crate::observability::{NoopObserver, Observer, ObserverEvent, ObserverMetric};
use crate::oracle::{Escalation, ScoringOracle, escalate};
use crate::repetition::RepetitionDetector;
use crate::scoring::{ScoreSource, Tier, TurnScore, TurnScorer};
use crate::store::ContextStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

pub struct EngagementEngine {
    admission: AdmissionController,
    store: Arc<dyn ContextStore>,
    scorer: TurnScorer,
    depth: DepthEngine,
    repetition: RepetitionDetector,
    gate: EngagementGate,
    oracle: Option<Arc<dyn ScoringOracle>>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn Observer>,
    history_limit: usize,
    oracle_timeout: Duration,
    oracle_classification: bool,
}

impl EngagementEngine {
    pub fn new(
        config: Config,
        store: Arc<dyn ContextStore>,
        oracle: Option<Arc<dyn ScoringOracle>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let oracle_timeout = config.oracle_timeout();
        Self {
            admission: AdmissionController::new(&config.admission, Arc::clone(&clock)),
            store,
            scorer: TurnScorer::new(config.scorer, oracle.clone(), oracle_timeout),
            depth: DepthEngine::new(config.depth),
            repetition: RepetitionDetector::new(config.repetition),
            oracle_classification: config.gate.oracle_classification,
            gate: EngagementGate::new(config.gate),
            oracle,
            clock,
            observer: Arc::new(NoopObserver),
            history_limit: config.store.history_limit,
            oracle_timeout,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.scorer = self.scorer.with_observer(Arc::clone(&observer));
        self.observer = observer;
        self
    }

    pub fn depth_engine(&self) -> &DepthEngine {
        &self.depth
    }

    pub fn scorer(&self) -> &TurnScorer {
        &self.scorer
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn process_turn(&self, request: TurnRequest) -> TurnOutcome {
        let now = self.clock.now();
        let admission = self.admission.check(&request.key);
        let projected = request
            .depth
            .as_ref()
            .map_or(0.0, |state| self.depth.peek(state, now));

        if !admission.allowed {
            tracing::debug!(key = %request.key, reset_at = %admission.reset_at, "turn rejected by admission");
            self.observer.record_event(&ObserverEvent::AdmissionRejected {
                key: request.key.clone(),
                limit: admission.limit,
            });
            return rejected(admission, projected);
        }

        let mut ctx = self.store.checkout(&request.key, now).await;

        if ctx.failsafe {
            ctx.push_message(&request.message, self.history_limit);
            let decision = self.gate.decide(&ctx, false);
            self.record_turn(&request.key, None, &decision, projected, None);
            return outcome(admission, projected, None, decision, false, None, None);
        }

        let history = ctx.history();
        let scan = self
            .repetition
            .scan(&request.message, &history, ctx.repetition_count);
        if scan.is_repeat {
            ctx.repetition_count = scan.cycle_count;
            tracing::debug!(key = %request.key, kind = ?scan.kind, cycles = scan.cycle_count, "repeated message");
        }
        if scan.pivot {
            self.observer.record_event(&ObserverEvent::PivotRecommended {
                key: request.key.clone(),
                cycles: scan.cycle_count,
            });
        }

        let identity = capture_identity(&request.message);
        for (field, value) in &identity.fields {
            ctx.captured_fields.insert(field.clone(), value.clone());
        }

        let score = self.scorer.score(&request.message, request.tier).await;
        let previous = request.depth.unwrap_or_else(|| DepthState::zero(now));
        let depth_state = self.depth.update(&previous, score.value, now);

        let classification = if request.message.trim().is_empty() || identity.is_malformed() {
            Classification::InvalidFormat
        } else {
            self.classify(&request.message, &history, request.tier).await
        };

        let decision = self.gate.transition(&mut ctx, classification, scan.pivot);
        if ctx.failsafe {
            self.observer.record_event(&ObserverEvent::FailsafeEntered {
                key: request.key.clone(),
                non_engagement_strikes: ctx.non_engagement_strikes,
            });
        }
        ctx.push_message(&request.message, self.history_limit);
        drop(ctx);

        self.record_turn(
            &request.key,
            Some(classification),
            &decision,
            depth_state.value,
            Some(score.source),
        );

        outcome(
            admission,
            depth_state.value,
            Some(depth_state),
            decision,
            scan.is_repeat,
            Some(classification),
            Some(score),
        )
    }

    /// Engagement quality of a turn: the oracle when permitted, otherwise
    /// (or when it fails) the deterministic rules.
    async fn classify(&self, message: &str, history: &[String], tier: Tier) -> Classification {
        let oracle = match &self.oracle {
            Some(oracle)
                if self.oracle_classification && self.scorer.config().allows_escalation(tier) =>
            {
                oracle
            }
            _ => return classify_heuristic(message),
        };

        match escalate(
            oracle.name(),
            self.oracle_timeout,
            oracle.classify(message, history),
        )
        .await
        {
            Escalation::Resolved { value, latency } => {
                self.observer
                    .record_metric(&ObserverMetric::OracleLatency(latency));
                value
            }
            Escalation::Fallback(error) => {
                tracing::warn!(error = %error, "oracle classification unavailable, using heuristic");
                self.observer.record_event(&ObserverEvent::OracleFallback {
                    stage: "classify",
                    reason: error.to_string(),
                });
                classify_heuristic(message)
            }
        }
    }

    fn record_turn(
        &self,
        key: &str,
        classification: Option<Classification>,
        decision: &GatingDecision,
        depth: f64,
        score_source: Option<ScoreSource>,
    ) {
        self.observer.record_event(&ObserverEvent::TurnProcessed {
            key: key.to_string(),
            classification,
            gating_state: decision.state,
            depth,
            score_source,
        });
    }

    /// External reset: forget the key's engagement context, including a
    /// failsafe. Turns already in flight for the key finish first. The
    /// admission window is left alone.
    pub async fn clear_session(&self, key: &str) -> bool {
        let existed = self.store.clear(key, self.now()).await;
        if existed {
            self.observer
                .record_event(&ObserverEvent::SessionCleared { key: key.to_string() });
        }
        existed
    }

    pub fn peek_admission(&self, key: &str) -> AdmissionDecision {
        self.admission.peek(key)
    }

    /// One eviction pass over contexts and admission windows.
    pub fn sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let report = SweepReport {
            contexts_evicted: self.store.sweep(now),
            windows_evicted: self.admission.sweep(now),
            active_contexts: self.store.len(),
            active_windows: self.admission.len(),
        };
        self.observer.record_event(&ObserverEvent::SweepCompleted {
            contexts_evicted: report.contexts_evicted,
            windows_evicted: report.windows_evicted,
        });
        self.observer
            .record_metric(&ObserverMetric::ActiveContexts(report.active_contexts as u64));
        self.observer
            .record_metric(&ObserverMetric::ActiveWindows(report.active_windows as u64));
        report
    }
}

fn rejected(admission: AdmissionDecision, depth: f64) -> TurnOutcome {
    TurnOutcome {
        allowed: false,
        remaining: 0,
        limit: admission.limit,
        reset_at: admission.reset_at,
        depth,
        depth_state: None,
        gating_state: GatingState::Continue,
        strategy: None,
        instruction_block: None,
        repetition_flag: false,
        classification: None,
        score: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn outcome(
    admission: AdmissionDecision,
    depth: f64,
    depth_state: Option<DepthState>,
    decision: GatingDecision,
    repetition_flag: bool,
    classification: Option<Classification>,
    score: Option<TurnScore>,
) -> TurnOutcome {
    TurnOutcome {
        allowed: true,
        remaining: admission.remaining,
        limit: admission.limit,
        reset_at: admission.reset_at,
        depth,
        depth_state,
        gating_state: decision.state,
        strategy: Some(decision.strategy),
        instruction_block: decision.instruction_block,
        repetition_flag,
        classification,
        score,
    }
}
