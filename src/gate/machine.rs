use super::classify::Classification;
use super::instruction::render_instruction_block;
use crate::config::GateConfig;
use crate::store::EngagementContext;
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GatingState {
    Continue,
    Warn,
    Failsafe,
}

/// Tone recommended to the response generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponseStrategy {
    Deepen,
    Encourage,
    Redirect,
    PivotToEscalation,
    Escalate,
}

impl ResponseStrategy {
    pub fn directive(self) -> &'static str {
        match self {
            Self::Deepen => "The user is engaged. Follow their lead and invite more depth.",
            Self::Encourage => {
                "The user is trying. Keep replies warm, short and easy to answer."
            }
            Self::Redirect => {
                "Engagement is slipping. Change the angle with one concrete, low-effort question."
            }
            Self::PivotToEscalation => {
                "The conversation is looping. Stop repeating the topic and steer toward creating an account."
            }
            Self::Escalate => {
                "Do not continue the conversation. Reply only with the registration message."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatingDecision {
    pub state: GatingState,
    pub strategy: ResponseStrategy,
    pub instruction_block: Option<String>,
}

/// Dual-counter strike state machine.
///
/// `non_engagement_strikes` drives failsafe; `honest_attempt_strikes` only
/// changes tone.
pub struct EngagementGate {
    config: GateConfig,
}

impl EngagementGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Apply one classified turn to `ctx` and decide how to respond.
    pub fn transition(
        &self,
        ctx: &mut EngagementContext,
        classification: Classification,
        pivot: bool,
    ) -> GatingDecision {
        if ctx.failsafe {
            return self.decide(ctx, pivot);
        }

        let c = &self.config;
        match classification {
            Classification::Genuine => {
                ctx.non_engagement_strikes = 0;
                ctx.honest_attempt_strikes = 0;
            }
            Classification::HonestAttempt => {
                ctx.honest_attempt_strikes =
                    ctx.honest_attempt_strikes.saturating_add(c.honest_attempt_weight);
            }
            Classification::Dismissive => {
                ctx.non_engagement_strikes =
                    ctx.non_engagement_strikes.saturating_add(c.dismissive_weight);
            }
            Classification::NonEngagement => {
                ctx.non_engagement_strikes =
                    ctx.non_engagement_strikes.saturating_add(c.non_engagement_weight);
            }
            Classification::Spam => {
                ctx.non_engagement_strikes = ctx.non_engagement_strikes.saturating_add(c.spam_weight);
            }
            Classification::InvalidFormat => {
                ctx.invalid_format_count = ctx.invalid_format_count.saturating_add(1);
                if ctx.invalid_format_count >= c.invalid_format_threshold {
                    ctx.non_engagement_strikes =
                        ctx.non_engagement_strikes.saturating_add(c.invalid_format_weight);
                }
            }
        }

        if ctx.non_engagement_strikes >= c.non_engagement_max {
            ctx.failsafe = true;
            tracing::info!(
                key = %ctx.key,
                strikes = ctx.non_engagement_strikes,
                classification = %classification,
                "engagement gate entered failsafe"
            );
        }

        self.decide(ctx, pivot)
    }

    /// Decision for the current posture of `ctx` without applying a turn.
    pub fn decide(&self, ctx: &EngagementContext, pivot: bool) -> GatingDecision {
        let honest_ceiling = ctx.honest_attempt_strikes >= self.config.honest_attempt_ceiling;

        let (state, strategy) = if ctx.failsafe {
            (GatingState::Failsafe, ResponseStrategy::Escalate)
        } else if pivot {
            (GatingState::Warn, ResponseStrategy::PivotToEscalation)
        } else if ctx.non_engagement_strikes > 0 || honest_ceiling {
            (GatingState::Warn, ResponseStrategy::Redirect)
        } else if ctx.honest_attempt_strikes > 0 {
            (GatingState::Continue, ResponseStrategy::Encourage)
        } else {
            (GatingState::Continue, ResponseStrategy::Deepen)
        };

        let instruction_block = if state == GatingState::Continue
            && strategy == ResponseStrategy::Deepen
            && ctx.captured_fields.is_empty()
        {
            None
        } else {
            Some(render_instruction_block(ctx, &self.config, state, strategy))
        };

        GatingDecision {
            state,
            strategy,
            instruction_block,
        }
    }

    /// Clear strikes, counters and the failsafe flag. Captured fields and
    /// history are kept.
    pub fn reset(&self, ctx: &mut EngagementContext) {
        ctx.non_engagement_strikes = 0;
        ctx.honest_attempt_strikes = 0;
        ctx.invalid_format_count = 0;
        ctx.repetition_count = 0;
        ctx.failsafe = false;
    }
}
