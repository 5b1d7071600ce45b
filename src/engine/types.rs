use crate::depth::DepthState;
use crate::gate::{Classification, GatingState, ResponseStrategy};
use crate::scoring::{Tier, TurnScore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One incoming user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Anonymous client identity used for admission and context.
    pub key: String,
    pub message: String,
    #[serde(default)]
    pub tier: Tier,
    /// Conversation depth as last persisted by the caller.
    #[serde(default)]
    pub depth: Option<DepthState>,
}

impl TurnRequest {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
            tier: Tier::default(),
            depth: None,
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_depth(mut self, depth: DepthState) -> Self {
        self.depth = Some(depth);
        self
    }
}

/// Per-turn result handed to the API layer and the response generator.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub allowed: bool,
    pub remaining: u32,
    pub limit: u32,
    pub reset_at: DateTime<Utc>,
    pub depth: f64,
    /// New depth state to persist. Absent when depth was not updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_state: Option<DepthState>,
    pub gating_state: GatingState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ResponseStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction_block: Option<String>,
    pub repetition_flag: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<TurnScore>,
}

/// What one eviction pass removed and what is left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub contexts_evicted: usize,
    pub windows_evicted: usize,
    pub active_contexts: usize,
    pub active_windows: usize,
}

impl SweepReport {
    pub fn evicted(&self) -> usize {
        self.contexts_evicted + self.windows_evicted
    }
}
