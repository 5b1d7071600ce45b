use crate::error::OracleError;
use crate::gate::Classification;
use crate::scoring::Tier;
use std::future::Future;
use std::pin::Pin;

pub type OracleFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, OracleError>> + Send + 'a>>;

/// External scoring and classification service, typically an LLM.
///
/// Both calls are optional enhancements: the engine always has a heuristic
/// answer ready and only consults the oracle when the heuristic is not
/// trusted. Implementations do not need their own timeout; callers wrap
/// every call in [`escalate`](super::escalate).
pub trait ScoringOracle: Send + Sync {
    /// Oracle identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Depth score for `text` in `[0, 1]`.
    fn score<'a>(&'a self, text: &'a str, tier: Tier) -> OracleFuture<'a, f64>;

    /// Engagement quality of `text`, with recent history for context.
    fn classify<'a>(
        &'a self,
        text: &'a str,
        history: &'a [String],
    ) -> OracleFuture<'a, Classification>;
}
