//! Engagement gate: turn classification, identity capture and the strike
//! state machine that decides when a key is cut off.

mod classify;
pub mod identity;
mod instruction;
mod machine;

pub use classify::{Classification, classify_heuristic};
pub use identity::{IdentityCapture, capture as capture_identity};
pub use instruction::render_instruction_block;
pub use machine::{EngagementGate, GatingDecision, GatingState, ResponseStrategy};
