mod context;
mod memory;
mod traits;

pub use context::EngagementContext;
pub use memory::InMemoryContextStore;
pub use traits::{ContextLease, ContextStore, LeaseCount, StoreFuture};
