use super::machine::{GatingState, ResponseStrategy};
use crate::config::GateConfig;
use crate::store::EngagementContext;
use std::fmt::Write;

/// Render the contextual instruction handed to the response generator.
pub fn render_instruction_block(
    ctx: &EngagementContext,
    config: &GateConfig,
    state: GatingState,
    strategy: ResponseStrategy,
) -> String {
    let mut out = String::from("[engagement]\n");

    if ctx.captured_fields.is_empty() {
        out.push_str("captured: none\n");
    } else {
        let fields = ctx
            .captured_fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "captured: {fields}");
    }

    let _ = writeln!(
        out,
        "strikes: non_engagement {}/{}, honest_attempt {}/{}",
        ctx.non_engagement_strikes,
        config.non_engagement_max,
        ctx.honest_attempt_strikes,
        config.honest_attempt_ceiling
    );
    let _ = writeln!(out, "repetition_cycles: {}", ctx.repetition_count);
    let _ = writeln!(out, "state: {state}");
    let _ = writeln!(out, "strategy: {strategy}");
    let _ = write!(out, "directive: {}", strategy.directive());

    if state == GatingState::Failsafe {
        let _ = write!(out, "\nmessage: {}", config.failsafe_message);
    }

    out
}
