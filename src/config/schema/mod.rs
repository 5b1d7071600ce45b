mod admission;
mod core;
mod engagement;
mod observability;
mod oracle;

pub use admission::{AdmissionConfig, StoreConfig, SweeperConfig};
pub use core::Config;
pub use engagement::{DepthConfig, GateConfig, RepetitionConfig, ScorerConfig};
pub use observability::ObservabilityConfig;
pub use oracle::OracleConfig;
