use super::context::EngagementContext;
use super::traits::{ContextLease, ContextStore, LeaseCount, StoreFuture};
use crate::clock::secs_delta;
use crate::config::StoreConfig;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

struct Slot {
    ctx: Arc<Mutex<EngagementContext>>,
    leases: Arc<AtomicUsize>,
}

/// Process-local context store.
///
/// Each key maps to an async mutex. Leases are registered while the key's
/// shard is write-locked, so the sweep (which takes the same shard lock)
/// never evicts a context that a turn is waiting on or holding.
pub struct InMemoryContextStore {
    slots: DashMap<String, Slot>,
    ttl: TimeDelta,
}

impl InMemoryContextStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            slots: DashMap::new(),
            ttl: secs_delta(config.ttl_secs),
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Copy of the stored context, if the key exists and is not leased.
    pub fn snapshot(&self, key: &str) -> Option<EngagementContext> {
        let slot = self.slots.get(key)?;
        let ctx = slot.ctx.try_lock().ok()?;
        Some(ctx.clone())
    }
}

impl ContextStore for InMemoryContextStore {
    fn checkout<'a>(&'a self, key: &'a str, now: DateTime<Utc>) -> StoreFuture<'a, ContextLease> {
        Box::pin(async move {
            let (ctx, count) = match self.slots.entry(key.to_string()) {
                Entry::Occupied(occupied) => {
                    let slot = occupied.get();
                    (Arc::clone(&slot.ctx), LeaseCount::acquire(&slot.leases))
                }
                Entry::Vacant(vacant) => {
                    tracing::debug!(key, "creating engagement context");
                    let slot = vacant.insert(Slot {
                        ctx: Arc::new(Mutex::new(EngagementContext::new(key, now))),
                        leases: Arc::new(AtomicUsize::new(0)),
                    });
                    (Arc::clone(&slot.ctx), LeaseCount::acquire(&slot.leases))
                }
            };
            // The shard guard is gone; waiting here only blocks this key. If
            // this future is dropped mid-wait, `count` releases the lease.
            let mut guard = ctx.lock_owned().await;
            guard.touch(now);
            ContextLease::new(guard, count)
        })
    }

    fn clear<'a>(&'a self, key: &'a str, now: DateTime<Utc>) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            let Some((ctx, count)) = self
                .slots
                .get(key)
                .map(|slot| (Arc::clone(&slot.ctx), LeaseCount::acquire(&slot.leases)))
            else {
                return false;
            };

            let mut guard = Arc::clone(&ctx).lock_owned().await;
            *guard = EngagementContext::new(key, now);
            // Only drop the slot when nobody else is queued on it; queued
            // turns pick up the fresh context instead.
            let removed = self
                .slots
                .remove_if(key, |_, slot| {
                    Arc::ptr_eq(&slot.ctx, &ctx) && slot.leases.load(Ordering::SeqCst) == 1
                })
                .is_some();
            drop(guard);
            drop(count);
            tracing::debug!(key, removed, "engagement context cleared");
            true
        })
    }

    fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| {
            if slot.leases.load(Ordering::SeqCst) > 0 {
                return true;
            }
            match slot.ctx.try_lock() {
                Ok(ctx) => !ctx.is_idle(now, self.ttl),
                Err(_) => true,
            }
        });
        before.saturating_sub(self.slots.len())
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}
