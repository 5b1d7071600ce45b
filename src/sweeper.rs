use crate::engine::EngagementEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Run [`EngagementEngine::sweep`] every `interval` until `shutdown` turns
/// `true` or its sender is dropped.
///
/// Idle keys are reclaimed even when no further traffic arrives.
pub fn spawn_sweeper(
    engine: Arc<EngagementEngine>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = engine.sweep();
                    if report.evicted() > 0 {
                        tracing::debug!(
                            contexts = report.contexts_evicted,
                            windows = report.windows_evicted,
                            active_contexts = report.active_contexts,
                            "sweep evicted idle state"
                        );
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("sweeper stopped");
    })
}
