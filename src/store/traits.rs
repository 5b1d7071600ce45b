use super::context::EngagementContext;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OwnedMutexGuard;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Per-key engagement state behind exclusive leases.
pub trait ContextStore: Send + Sync {
    /// Wait for exclusive access to `key`'s context, creating it on first
    /// use. Waiters are served in arrival order and mutations are kept when
    /// the lease drops.
    fn checkout<'a>(&'a self, key: &'a str, now: DateTime<Utc>) -> StoreFuture<'a, ContextLease>;

    /// Reset `key` to a fresh context. Waits behind turns already holding or
    /// awaiting the key, so a cleared key never has two turns in flight.
    /// Returns whether a context existed.
    fn clear<'a>(&'a self, key: &'a str, now: DateTime<Utc>) -> StoreFuture<'a, bool>;

    /// Evict contexts idle beyond the TTL that nobody holds or awaits.
    fn sweep(&self, now: DateTime<Utc>) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One registered interest in a stored context, held while a caller waits
/// for or holds it. Released on drop, including when the wait is cancelled.
#[derive(Debug)]
pub struct LeaseCount(Arc<AtomicUsize>);

impl LeaseCount {
    pub fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for LeaseCount {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Exclusive handle on one key's context.
pub struct ContextLease {
    // Field order matters: the mutex unlocks before the count drops.
    guard: OwnedMutexGuard<EngagementContext>,
    _count: LeaseCount,
}

impl ContextLease {
    pub fn new(guard: OwnedMutexGuard<EngagementContext>, count: LeaseCount) -> Self {
        Self {
            guard,
            _count: count,
        }
    }
}

impl Deref for ContextLease {
    type Target = EngagementContext;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl DerefMut for ContextLease {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl std::fmt::Debug for ContextLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextLease")
            .field("key", &self.guard.key)
            .finish_non_exhaustive()
    }
}
