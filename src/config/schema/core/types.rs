use super::super::{
    AdmissionConfig, DepthConfig, GateConfig, ObservabilityConfig, OracleConfig, RepetitionConfig,
    ScorerConfig, StoreConfig, SweeperConfig,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub depth: DepthConfig,

    #[serde(default)]
    pub scorer: ScorerConfig,

    #[serde(default)]
    pub admission: AdmissionConfig,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub repetition: RepetitionConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub sweeper: SweeperConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.depth.validate()?;
        self.scorer.validate()?;
        self.admission.validate()?;
        self.gate.validate()?;
        self.repetition.validate()?;
        self.store.validate()?;
        self.oracle.validate()?;
        Ok(())
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle.timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweeper.interval_secs.max(1))
    }
}
