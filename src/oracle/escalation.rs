use crate::error::OracleError;
use std::future::Future;
use std::time::{Duration, Instant};

/// Outcome of a bounded oracle call: the oracle's answer, or the reason the
/// caller has to fall back to its heuristic.
#[derive(Debug)]
pub enum Escalation<T> {
    Resolved { value: T, latency: Duration },
    Fallback(OracleError),
}

/// Await `call` for at most `timeout`.
///
/// Errors and timeouts both become [`Escalation::Fallback`]; this never
/// fails and never waits longer than the budget.
pub async fn escalate<T, F>(oracle: &str, timeout: Duration, call: F) -> Escalation<T>
where
    F: Future<Output = Result<T, OracleError>>,
{
    let started = Instant::now();
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Escalation::Resolved {
            value,
            latency: started.elapsed(),
        },
        Ok(Err(error)) => Escalation::Fallback(error),
        Err(_) => Escalation::Fallback(OracleError::Timeout {
            oracle: oracle.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
