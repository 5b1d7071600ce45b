//! Fixed-window admission control per client key.
//!
//! Each key owns one [`RateWindow`] in a sharded map. `check` runs under
//! the key's entry lock, so two concurrent requests for the same key can
//! never both take the last slot. Different keys only contend when they
//! hash to the same shard.

use crate::clock::{Clock, saturating_add, secs_delta};
use crate::config::AdmissionConfig;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateWindow {
    pub key: String,
    pub window_start: DateTime<Utc>,
    pub count: u32,
    pub limit: u32,
    pub window_duration: TimeDelta,
}

impl RateWindow {
    fn open(key: &str, now: DateTime<Utc>, limit: u32, window_duration: TimeDelta) -> Self {
        Self {
            key: key.to_string(),
            window_start: now,
            count: 1,
            limit,
            window_duration,
        }
    }

    pub fn reset_at(&self) -> DateTime<Utc> {
        saturating_add(self.window_start, self.window_duration)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.reset_at()
    }

    fn decision(&self) -> AdmissionDecision {
        AdmissionDecision {
            allowed: self.count <= self.limit,
            remaining: self.limit.saturating_sub(self.count),
            limit: self.limit,
            reset_at: self.reset_at(),
        }
    }
}

/// Result of an admission check. Rejection is a value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdmissionDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub limit: u32,
    pub reset_at: DateTime<Utc>,
}

pub struct AdmissionController {
    windows: DashMap<String, RateWindow>,
    limit: u32,
    window: TimeDelta,
    grace: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl AdmissionController {
    pub fn new(config: &AdmissionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            limit: config.limit,
            window: secs_delta(config.window_secs),
            grace: secs_delta(config.grace_secs),
            clock,
        }
    }

    /// Count one request against `key`'s window.
    pub fn check(&self, key: &str) -> AdmissionDecision {
        let now = self.clock.now();
        match self.windows.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let window = occupied.get_mut();
                if window.is_expired(now) {
                    *window = RateWindow::open(key, now, self.limit, self.window);
                } else if window.count <= window.limit {
                    // Stops one past the limit; further rejections leave it there.
                    window.count += 1;
                }
                window.decision()
            }
            Entry::Vacant(vacant) => vacant
                .insert(RateWindow::open(key, now, self.limit, self.window))
                .decision(),
        }
    }

    /// Current standing of `key` without counting a request. An absent or
    /// expired window reports as fresh.
    pub fn peek(&self, key: &str) -> AdmissionDecision {
        let now = self.clock.now();
        if let Some(window) = self.windows.get(key)
            && !window.is_expired(now)
        {
            return window.decision();
        }
        AdmissionDecision {
            allowed: true,
            remaining: self.limit,
            limit: self.limit,
            reset_at: saturating_add(now, self.window),
        }
    }

    /// Drop windows that expired more than the grace period ago.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, window| saturating_add(window.reset_at(), self.grace) >= now);
        before.saturating_sub(self.windows.len())
    }

    pub fn clear(&self, key: &str) -> bool {
        self.windows.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController")
            .field("limit", &self.limit)
            .field("window", &self.window)
            .field("keys", &self.windows.len())
            .finish_non_exhaustive()
    }
}
