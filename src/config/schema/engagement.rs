use crate::error::ConfigError;
use crate::scoring::Tier;
use serde::{Deserialize, Serialize};

/// Asymmetric-inertia depth tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthConfig {
    /// Fraction of the gap closed when the turn score is above current depth
    #[serde(default = "default_up_rate")]
    pub up_rate: f64,
    /// Fraction of the gap closed when the turn score is at or below current depth
    #[serde(default = "default_down_rate")]
    pub down_rate: f64,
    /// Exponential decay per second of idle time (0 disables decay)
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
}

fn default_up_rate() -> f64 {
    0.5
}
fn default_down_rate() -> f64 {
    0.1
}
fn default_decay_rate() -> f64 {
    0.000_2
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            up_rate: default_up_rate(),
            down_rate: default_down_rate(),
            decay_rate: default_decay_rate(),
        }
    }
}

impl DepthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (label, rate) in [("up_rate", self.up_rate), ("down_rate", self.down_rate)] {
            if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
                return Err(ConfigError::Validation(format!(
                    "depth.{label} must be in (0.0, 1.0], got {rate}"
                )));
            }
        }
        if self.down_rate >= self.up_rate {
            return Err(ConfigError::Validation(format!(
                "depth.down_rate ({}) must be lower than depth.up_rate ({})",
                self.down_rate, self.up_rate
            )));
        }
        if !self.decay_rate.is_finite() || self.decay_rate < 0.0 {
            return Err(ConfigError::Validation(format!(
                "depth.decay_rate must be a non-negative number, got {}",
                self.decay_rate
            )));
        }
        Ok(())
    }
}

/// Heuristic turn scoring and oracle escalation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    #[serde(default = "default_pronoun_weight")]
    pub pronoun_weight: f64,
    #[serde(default = "default_emotion_weight")]
    pub emotion_weight: f64,
    #[serde(default = "default_introspection_weight")]
    pub introspection_weight: f64,
    #[serde(default = "default_length_weight")]
    pub length_weight: f64,
    /// Lower bound (inclusive) of the band where the heuristic is not trusted
    #[serde(default = "default_ambiguous_low")]
    pub ambiguous_low: f64,
    /// Upper bound (inclusive) of the band where the heuristic is not trusted
    #[serde(default = "default_ambiguous_high")]
    pub ambiguous_high: f64,
    /// Messages longer than this many characters always escalate
    #[serde(default = "default_long_message_chars")]
    pub long_message_chars: usize,
    /// Tiers allowed to trigger oracle calls
    #[serde(default = "default_escalation_tiers")]
    pub escalation_tiers: Vec<Tier>,
}

fn default_pronoun_weight() -> f64 {
    0.3
}
fn default_emotion_weight() -> f64 {
    0.3
}
fn default_introspection_weight() -> f64 {
    0.25
}
fn default_length_weight() -> f64 {
    0.15
}
fn default_ambiguous_low() -> f64 {
    0.35
}
fn default_ambiguous_high() -> f64 {
    0.65
}
fn default_long_message_chars() -> usize {
    600
}
fn default_escalation_tiers() -> Vec<Tier> {
    Tier::ALL.to_vec()
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            pronoun_weight: default_pronoun_weight(),
            emotion_weight: default_emotion_weight(),
            introspection_weight: default_introspection_weight(),
            length_weight: default_length_weight(),
            ambiguous_low: default_ambiguous_low(),
            ambiguous_high: default_ambiguous_high(),
            long_message_chars: default_long_message_chars(),
            escalation_tiers: default_escalation_tiers(),
        }
    }
}

impl ScorerConfig {
    pub fn weight_sum(&self) -> f64 {
        self.pronoun_weight + self.emotion_weight + self.introspection_weight + self.length_weight
    }

    pub fn allows_escalation(&self, tier: Tier) -> bool {
        self.escalation_tiers.contains(&tier)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            self.pronoun_weight,
            self.emotion_weight,
            self.introspection_weight,
            self.length_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Validation(
                "scorer weights must be non-negative numbers".into(),
            ));
        }
        if self.weight_sum() <= 0.0 {
            return Err(ConfigError::Validation(
                "scorer weights must not all be zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.ambiguous_low)
            || !(0.0..=1.0).contains(&self.ambiguous_high)
            || self.ambiguous_low > self.ambiguous_high
        {
            return Err(ConfigError::Validation(format!(
                "scorer ambiguous band [{}, {}] must be an ordered range within [0.0, 1.0]",
                self.ambiguous_low, self.ambiguous_high
            )));
        }
        Ok(())
    }
}

/// Strike weights and ceilings for the engagement gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Non-engagement strikes at which the key enters failsafe
    #[serde(default = "default_non_engagement_max")]
    pub non_engagement_max: u32,
    /// Honest-attempt strikes at which tone shifts (never gates)
    #[serde(default = "default_honest_attempt_ceiling")]
    pub honest_attempt_ceiling: u32,
    #[serde(default = "default_honest_attempt_weight")]
    pub honest_attempt_weight: u32,
    #[serde(default = "default_dismissive_weight")]
    pub dismissive_weight: u32,
    #[serde(default = "default_non_engagement_weight")]
    pub non_engagement_weight: u32,
    #[serde(default = "default_non_engagement_weight")]
    pub spam_weight: u32,
    /// Malformed turns tolerated before each one also counts as a strike
    #[serde(default = "default_invalid_format_threshold")]
    pub invalid_format_threshold: u32,
    #[serde(default = "default_invalid_format_weight")]
    pub invalid_format_weight: u32,
    /// Ask the oracle to classify turns when one is configured
    #[serde(default = "default_true")]
    pub oracle_classification: bool,
    /// Fixed message emitted once a key is in failsafe
    #[serde(default = "default_failsafe_message")]
    pub failsafe_message: String,
}

fn default_non_engagement_max() -> u32 {
    3
}
fn default_honest_attempt_ceiling() -> u32 {
    5
}
fn default_honest_attempt_weight() -> u32 {
    1
}
fn default_dismissive_weight() -> u32 {
    2
}
fn default_non_engagement_weight() -> u32 {
    3
}
fn default_invalid_format_threshold() -> u32 {
    2
}
fn default_invalid_format_weight() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_failsafe_message() -> String {
    "To keep this conversation going, please create a free account.".into()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            non_engagement_max: default_non_engagement_max(),
            honest_attempt_ceiling: default_honest_attempt_ceiling(),
            honest_attempt_weight: default_honest_attempt_weight(),
            dismissive_weight: default_dismissive_weight(),
            non_engagement_weight: default_non_engagement_weight(),
            spam_weight: default_non_engagement_weight(),
            invalid_format_threshold: default_invalid_format_threshold(),
            invalid_format_weight: default_invalid_format_weight(),
            oracle_classification: true,
            failsafe_message: default_failsafe_message(),
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.non_engagement_max == 0 {
            return Err(ConfigError::Validation(
                "gate.non_engagement_max must be >= 1".into(),
            ));
        }
        if self.honest_attempt_ceiling == 0 {
            return Err(ConfigError::Validation(
                "gate.honest_attempt_ceiling must be >= 1".into(),
            ));
        }
        if self.failsafe_message.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gate.failsafe_message must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Exact and near-duplicate repetition detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepetitionConfig {
    /// Jaccard similarity over lowercase word sets that counts as a repeat
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Whether a similarity exactly at the threshold counts
    #[serde(default = "default_true")]
    pub inclusive: bool,
    /// How many recent history entries are compared
    #[serde(default = "default_lookback")]
    pub lookback: usize,
    /// Repeat cycles after which responses pivot to escalation
    #[serde(default = "default_cycle_threshold")]
    pub cycle_threshold: u32,
}

fn default_similarity_threshold() -> f64 {
    0.70
}
fn default_lookback() -> usize {
    10
}
fn default_cycle_threshold() -> u32 {
    2
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            inclusive: true,
            lookback: default_lookback(),
            cycle_threshold: default_cycle_threshold(),
        }
    }
}

impl RepetitionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Validation(format!(
                "repetition.similarity_threshold must be in [0.0, 1.0], got {}",
                self.similarity_threshold
            )));
        }
        if self.cycle_threshold == 0 {
            return Err(ConfigError::Validation(
                "repetition.cycle_threshold must be >= 1".into(),
            ));
        }
        Ok(())
    }
}
