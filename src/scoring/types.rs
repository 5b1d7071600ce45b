use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Caller-declared client tier. Used as the cost-control hook that decides
/// whether a turn may be escalated to the scoring oracle.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    #[default]
    Anonymous,
    Free,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Anonymous, Tier::Free, Tier::Premium];
}

/// Where a [`TurnScore`] value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreSource {
    Heuristic,
    Oracle,
    HeuristicFallback,
}

/// Depth signal for a single turn. Created once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnScore {
    pub value: f64,
    pub source: ScoreSource,
}

impl TurnScore {
    pub fn new(value: f64, source: ScoreSource) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { value, source }
    }
}
