//! Conversational depth tracking.
//!
//! Depth is a scalar in `[0, 1]` that moves toward each turn's score with
//! asymmetric inertia: it deepens quickly (`up_rate`) and recovers
//! shallowness slowly (`down_rate`). Idle time decays it exponentially
//! before the new score is applied.
//!
//! The engine is pure. The conversation owns its [`DepthState`]; callers
//! pass the previous state in and persist the returned one.

use crate::clock::elapsed_secs;
use crate::config::DepthConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthState {
    pub value: f64,
    pub last_updated: DateTime<Utc>,
}

impl DepthState {
    pub fn new(value: f64, last_updated: DateTime<Utc>) -> Self {
        Self {
            value: clamp_unit(value),
            last_updated,
        }
    }

    /// Zero depth as of `now`.
    pub fn zero(now: DateTime<Utc>) -> Self {
        Self::new(0.0, now)
    }
}

#[derive(Debug, Clone)]
pub struct DepthEngine {
    config: DepthConfig,
}

impl DepthEngine {
    pub fn new(config: DepthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DepthConfig {
        &self.config
    }

    /// Apply one turn's score to `state`.
    pub fn update(&self, state: &DepthState, raw_score: f64, now: DateTime<Utc>) -> DepthState {
        let mut value = self.decayed(state, now);
        let target = clamp_unit(raw_score);

        let rate = if target > value {
            self.config.up_rate
        } else {
            self.config.down_rate
        };
        value += rate * (target - value);

        DepthState {
            value: clamp_unit(value),
            last_updated: now,
        }
    }

    /// Decay-projected depth at `now`. Does not modify `state`.
    pub fn peek(&self, state: &DepthState, now: DateTime<Utc>) -> f64 {
        self.decayed(state, now)
    }

    pub fn reset(&self, now: DateTime<Utc>) -> DepthState {
        DepthState::zero(now)
    }

    fn decayed(&self, state: &DepthState, now: DateTime<Utc>) -> f64 {
        let elapsed = elapsed_secs(state.last_updated, now);
        let factor = (-self.config.decay_rate.max(0.0) * elapsed).exp();
        (clamp_unit(state.value) * factor).max(0.0)
    }
}

/// Clamp to `[0, 1]`; NaN becomes 0.
fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
