pub mod schema;

pub use schema::{
    AdmissionConfig, Config, DepthConfig, GateConfig, ObservabilityConfig, OracleConfig,
    RepetitionConfig, ScorerConfig, StoreConfig, SweeperConfig,
};
