mod escalation;
pub mod http;
pub mod traits;

pub use escalation::{Escalation, escalate};
pub use http::HttpOracle;
pub use traits::{OracleFuture, ScoringOracle};

use crate::config::OracleConfig;
use std::sync::Arc;

/// Factory: build the configured oracle, or `None` when disabled.
pub fn create_oracle(config: &OracleConfig) -> Option<Arc<dyn ScoringOracle>> {
    if !config.enabled {
        return None;
    }
    if config.api_key.is_none() {
        tracing::warn!(
            base_url = %config.base_url,
            "oracle enabled without an API key; requests are sent unauthenticated"
        );
    }
    Some(Arc::new(HttpOracle::new(config)))
}
