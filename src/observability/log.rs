use super::traits::{Observer, ObserverEvent, ObserverMetric};
use tracing::{info, warn};

/// Writes engine events as structured `tracing` records.
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for LogObserver {
    fn record_event(&self, event: &ObserverEvent) {
        match event {
            ObserverEvent::AdmissionRejected { key, limit } => {
                info!(key = %key, limit = limit, "admission.rejected");
            }
            ObserverEvent::TurnProcessed {
                key,
                classification,
                gating_state,
                depth,
                score_source,
            } => {
                let classification =
                    classification.map_or_else(|| "none".to_string(), |c| c.to_string());
                let source = score_source.map_or_else(|| "none".to_string(), |s| s.to_string());
                info!(
                    key = %key,
                    classification = %classification,
                    gating_state = %gating_state,
                    depth = depth,
                    score_source = %source,
                    "turn.processed"
                );
            }
            ObserverEvent::OracleFallback { stage, reason } => {
                warn!(stage = stage, reason = %reason, "oracle.fallback");
            }
            ObserverEvent::FailsafeEntered {
                key,
                non_engagement_strikes,
            } => {
                warn!(key = %key, strikes = non_engagement_strikes, "gate.failsafe");
            }
            ObserverEvent::PivotRecommended { key, cycles } => {
                info!(key = %key, cycles = cycles, "gate.pivot");
            }
            ObserverEvent::SessionCleared { key } => {
                info!(key = %key, "session.cleared");
            }
            ObserverEvent::SweepCompleted {
                contexts_evicted,
                windows_evicted,
            } => {
                info!(
                    contexts = contexts_evicted,
                    windows = windows_evicted,
                    "sweep.completed"
                );
            }
        }
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        match metric {
            ObserverMetric::OracleLatency(d) => {
                let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
                info!(latency_ms = ms, "metric.oracle_latency");
            }
            ObserverMetric::ActiveContexts(n) => {
                info!(contexts = n, "metric.active_contexts");
            }
            ObserverMetric::ActiveWindows(n) => {
                info!(windows = n, "metric.active_windows");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}
