//! Exact and near-duplicate detection against recent history.

use crate::config::RepetitionConfig;
use crate::utils::text::word_set;
use serde::Serialize;
use std::collections::HashSet;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RepeatKind {
    Exact,
    NearDuplicate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepetitionScan {
    pub is_repeat: bool,
    pub kind: Option<RepeatKind>,
    /// Highest Jaccard similarity seen among the compared entries.
    pub best_similarity: f64,
    pub cycle_count: u32,
    pub pivot: bool,
}

pub struct RepetitionDetector {
    config: RepetitionConfig,
}

impl RepetitionDetector {
    pub fn new(config: RepetitionConfig) -> Self {
        Self { config }
    }

    /// Compare `message` with the last `lookback` entries of `history`
    /// (oldest first). `prior_cycles` is the repeat count carried by the
    /// context.
    pub fn scan<S: AsRef<str>>(
        &self,
        message: &str,
        history: &[S],
        prior_cycles: u32,
    ) -> RepetitionScan {
        let trimmed = message.trim();
        let skip = history.len().saturating_sub(self.config.lookback);
        let recent = &history[skip..];

        let mut kind = None;
        let mut best_similarity: f64 = 0.0;

        if !trimmed.is_empty() {
            if recent.iter().any(|entry| entry.as_ref().trim() == trimmed) {
                kind = Some(RepeatKind::Exact);
                best_similarity = 1.0;
            } else {
                let words = word_set(trimmed);
                for entry in recent {
                    best_similarity = best_similarity.max(jaccard(&words, &word_set(entry.as_ref())));
                }
                if self.meets_threshold(best_similarity) {
                    kind = Some(RepeatKind::NearDuplicate);
                }
            }
        }

        let is_repeat = kind.is_some();
        let cycle_count = if is_repeat {
            prior_cycles.saturating_add(1)
        } else {
            prior_cycles
        };
        let pivot = is_repeat && cycle_count >= self.config.cycle_threshold;

        RepetitionScan {
            is_repeat,
            kind,
            best_similarity,
            cycle_count,
            pivot,
        }
    }

    fn meets_threshold(&self, similarity: f64) -> bool {
        // Word sets are tiny; tolerate float noise at the boundary.
        let threshold = self.config.similarity_threshold;
        if self.config.inclusive {
            similarity >= threshold - 1e-9
        } else {
            similarity > threshold + 1e-9
        }
    }
}

pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}
