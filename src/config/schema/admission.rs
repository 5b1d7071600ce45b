use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Fixed-window admission limits per client key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Requests admitted per window
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Expired windows are kept this long before the sweep drops them
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
}

fn default_limit() -> u32 {
    30
}
fn default_window_secs() -> u64 {
    3600
}
fn default_grace_secs() -> u64 {
    60
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            window_secs: default_window_secs(),
            grace_secs: default_grace_secs(),
        }
    }
}

impl AdmissionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::Validation("admission.limit must be >= 1".into()));
        }
        if self.window_secs == 0 {
            return Err(ConfigError::Validation(
                "admission.window_secs must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Per-key engagement context retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Raw messages kept per key (oldest dropped first)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Inactivity before a context is evicted
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_history_limit() -> usize {
    20
}
fn default_ttl_secs() -> u64 {
    1800
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::Validation(
                "store.history_limit must be >= 1".into(),
            ));
        }
        if self.ttl_secs == 0 {
            return Err(ConfigError::Validation("store.ttl_secs must be >= 1".into()));
        }
        Ok(())
    }
}

/// Background eviction timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_true() -> bool {
    true
}
fn default_interval_secs() -> u64 {
    60
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
        }
    }
}
