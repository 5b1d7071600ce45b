use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Per-key engagement memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementContext {
    pub key: String,
    pub captured_fields: BTreeMap<String, String>,
    pub message_history: VecDeque<String>,
    pub non_engagement_strikes: u32,
    pub honest_attempt_strikes: u32,
    pub invalid_format_count: u32,
    pub repetition_count: u32,
    /// Terminal until the context is reset or evicted.
    pub failsafe: bool,
    pub last_seen: DateTime<Utc>,
}

impl EngagementContext {
    pub fn new(key: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            captured_fields: BTreeMap::new(),
            message_history: VecDeque::new(),
            non_engagement_strikes: 0,
            honest_attempt_strikes: 0,
            invalid_format_count: 0,
            repetition_count: 0,
            failsafe: false,
            last_seen: now,
        }
    }

    /// Append a message, dropping the oldest entries beyond `limit`.
    pub fn push_message(&mut self, message: &str, limit: usize) {
        if limit == 0 {
            self.message_history.clear();
            return;
        }
        self.message_history.push_back(message.to_string());
        while self.message_history.len() > limit {
            self.message_history.pop_front();
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.message_history.iter().cloned().collect()
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = self.last_seen.max(now);
    }

    pub fn is_idle(&self, now: DateTime<Utc>, ttl: chrono::TimeDelta) -> bool {
        now - self.last_seen > ttl
    }
}
