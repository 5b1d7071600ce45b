use crate::gate::{Classification, GatingState};
use crate::scoring::ScoreSource;
use std::time::Duration;

/// Events the observer can record
#[derive(Debug, Clone)]
pub enum ObserverEvent {
    AdmissionRejected {
        key: String,
        limit: u32,
    },
    TurnProcessed {
        key: String,
        classification: Option<Classification>,
        gating_state: GatingState,
        depth: f64,
        score_source: Option<ScoreSource>,
    },
    OracleFallback {
        stage: &'static str,
        reason: String,
    },
    FailsafeEntered {
        key: String,
        non_engagement_strikes: u32,
    },
    PivotRecommended {
        key: String,
        cycles: u32,
    },
    SessionCleared {
        key: String,
    },
    SweepCompleted {
        contexts_evicted: usize,
        windows_evicted: usize,
    },
}

/// Numeric metrics
#[derive(Debug, Clone)]
pub enum ObserverMetric {
    OracleLatency(Duration),
    ActiveContexts(u64),
    ActiveWindows(u64),
}

/// Sink for engine events and metrics.
pub trait Observer: Send + Sync {
    /// Record a discrete event
    fn record_event(&self, event: &ObserverEvent);

    /// Record a numeric metric
    fn record_metric(&self, metric: &ObserverMetric);

    /// Flush any buffered data (no-op for most backends)
    fn flush(&self) {}

    /// Human-readable name of this observer
    fn name(&self) -> &str;
}
