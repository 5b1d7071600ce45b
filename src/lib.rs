#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use,
    clippy::cast_precision_loss
)]

pub mod admission;
pub mod clock;
pub mod config;
pub mod depth;
pub mod engine;
pub mod error;
pub mod gate;
#[doc(hidden)]
pub mod observability;
pub mod oracle;
pub mod repetition;
pub mod scoring;
pub mod store;
pub mod sweeper;
pub mod utils;

pub use config::Config;
pub use engine::{EngagementEngine, SweepReport, TurnOutcome, TurnRequest};
pub use error::{DepthgateError, Result};
