use crate::utils::text::{contains_phrase, normalize, words};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Engagement quality of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Classification {
    Genuine,
    HonestAttempt,
    Dismissive,
    NonEngagement,
    Spam,
    InvalidFormat,
}

const DISMISSIVE_PHRASES: &[&str] = &[
    "whatever",
    "who cares",
    "don't care",
    "dont care",
    "not interested",
    "leave me alone",
    "this is stupid",
    "this is dumb",
    "boring",
    "shut up",
    "go away",
    "stop asking",
    "none of your business",
    "doesn't matter",
    "so what",
];

const FILLER_WORDS: &[&str] = &[
    "k", "kk", "ok", "okay", "lol", "lmao", "haha", "hmm", "hm", "meh", "no", "nah", "yes",
    "yeah", "yep", "sure", "fine", "cool", "nice", "what", "huh", "idk", "eh", "ya", "ye",
];

const HEDGE_PHRASES: &[&str] = &[
    "i don't know",
    "i dont know",
    "not sure",
    "i'm not sure",
    "i guess",
    "maybe",
    "hard to say",
    "i think",
    "i'll try",
    "let me think",
];

const SPAM_MARKERS: &[&str] = &["http://", "https://", "www.", "buy now", "click here", "free money"];

/// Longest run of one repeated character that still reads as text.
const MAX_CHAR_RUN: usize = 6;
/// Consonant run length treated as keyboard mashing ("asdfghjkl").
const MASH_CONSONANT_RUN: usize = 6;
/// Word counts that read as a short-but-real reply.
const HONEST_ATTEMPT_WORDS: std::ops::RangeInclusive<usize> = 3..=7;

/// Deterministic fallback classifier: pattern, keyword and length rules
/// applied in a fixed order.
pub fn classify_heuristic(message: &str) -> Classification {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Classification::InvalidFormat;
    }

    let tokens = words(trimmed);
    if looks_like_spam(trimmed, &tokens) {
        return Classification::Spam;
    }
    // Emoji or punctuation only: unreadable rather than abusive.
    if tokens.is_empty() {
        return Classification::InvalidFormat;
    }

    let normalized = normalize(trimmed);
    if DISMISSIVE_PHRASES
        .iter()
        .any(|phrase| contains_phrase(&normalized, phrase))
    {
        return Classification::Dismissive;
    }

    if tokens.len() <= 2 && tokens.iter().all(|w| FILLER_WORDS.contains(&w.as_str())) {
        return Classification::NonEngagement;
    }

    if HONEST_ATTEMPT_WORDS.contains(&tokens.len())
        || tokens.len() <= 2
        || HEDGE_PHRASES
            .iter()
            .any(|phrase| contains_phrase(&normalized, phrase))
    {
        return Classification::HonestAttempt;
    }

    Classification::Genuine
}

fn looks_like_spam(raw: &str, tokens: &[String]) -> bool {
    let lower = raw.to_lowercase();
    if SPAM_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return true;
    }
    if longest_char_run(raw) > MAX_CHAR_RUN {
        return true;
    }
    tokens.iter().any(|token| is_keyboard_mash(token))
}

fn longest_char_run(s: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;
    for c in s.chars().filter(|c| !c.is_whitespace()) {
        if previous == Some(c) {
            current += 1;
        } else {
            current = 1;
            previous = Some(c);
        }
        longest = longest.max(current);
    }
    longest
}

fn is_keyboard_mash(token: &str) -> bool {
    let mut run = 0;
    for c in token.chars() {
        if c.is_ascii_alphabetic() && !"aeiouy".contains(c) {
            run += 1;
            if run >= MASH_CONSONANT_RUN {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}
