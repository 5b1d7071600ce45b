//! Per-turn depth scoring.
//!
//! The heuristic always runs. The oracle is consulted only when the
//! heuristic is not trusted (ambiguous band, long message, hedging
//! markers) and the tier permits the cost. Oracle failure degrades to the
//! heuristic value and is never surfaced to the caller.

pub mod heuristic;
mod lexicon;
mod types;

pub use heuristic::{HeuristicBreakdown, analyze};
pub use types::{ScoreSource, Tier, TurnScore};

use crate::config::ScorerConfig;
use crate::observability::{NoopObserver, Observer, ObserverEvent, ObserverMetric};
use crate::oracle::{Escalation, ScoringOracle, escalate};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;

/// Why a turn was escalated to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EscalationTrigger {
    AmbiguousBand,
    LongMessage,
    AmbiguityMarkers,
}

pub struct TurnScorer {
    config: ScorerConfig,
    oracle: Option<Arc<dyn ScoringOracle>>,
    timeout: Duration,
    observer: Arc<dyn Observer>,
}

impl TurnScorer {
    pub fn new(
        config: ScorerConfig,
        oracle: Option<Arc<dyn ScoringOracle>>,
        timeout: Duration,
    ) -> Self {
        Self {
            config,
            oracle,
            timeout,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Heuristic-only breakdown, never touches the oracle.
    pub fn heuristic(&self, message: &str) -> HeuristicBreakdown {
        analyze(message, &self.config)
    }

    /// The first trigger that applies to `message`, ignoring tier and
    /// oracle availability.
    pub fn escalation_trigger(
        &self,
        message: &str,
        breakdown: &HeuristicBreakdown,
    ) -> Option<EscalationTrigger> {
        if (self.config.ambiguous_low..=self.config.ambiguous_high).contains(&breakdown.value) {
            Some(EscalationTrigger::AmbiguousBand)
        } else if message.chars().count() > self.config.long_message_chars {
            Some(EscalationTrigger::LongMessage)
        } else if breakdown.ambiguity_markers > 0 {
            Some(EscalationTrigger::AmbiguityMarkers)
        } else {
            None
        }
    }

    pub async fn score(&self, message: &str, tier: Tier) -> TurnScore {
        let breakdown = self.heuristic(message);

        let Some(trigger) = self.escalation_trigger(message, &breakdown) else {
            return TurnScore::new(breakdown.value, ScoreSource::Heuristic);
        };
        let Some(oracle) = self.oracle.as_ref() else {
            return TurnScore::new(breakdown.value, ScoreSource::Heuristic);
        };
        if !self.config.allows_escalation(tier) {
            tracing::debug!(tier = %tier, trigger = %trigger, "escalation not permitted for tier");
            return TurnScore::new(breakdown.value, ScoreSource::Heuristic);
        }

        tracing::debug!(
            trigger = %trigger,
            heuristic = breakdown.value,
            oracle = oracle.name(),
            "escalating turn score"
        );
        match escalate(oracle.name(), self.timeout, oracle.score(message, tier)).await {
            Escalation::Resolved { value, latency } if value.is_finite() => {
                self.observer
                    .record_metric(&ObserverMetric::OracleLatency(latency));
                TurnScore::new(value, ScoreSource::Oracle)
            }
            Escalation::Resolved { .. } => {
                self.fallback("oracle returned a non-finite score".to_string());
                TurnScore::new(breakdown.value, ScoreSource::HeuristicFallback)
            }
            Escalation::Fallback(error) => {
                self.fallback(error.to_string());
                TurnScore::new(breakdown.value, ScoreSource::HeuristicFallback)
            }
        }
    }

    fn fallback(&self, reason: String) {
        tracing::warn!(reason = %reason, "oracle score unavailable, using heuristic");
        self.observer.record_event(&ObserverEvent::OracleFallback {
            stage: "score",
            reason,
        });
    }
}
