use super::lexicon::{AMBIGUITY_MARKERS, EMOTION_WORDS, FIRST_PERSON, INTROSPECTIVE_PHRASES};
use crate::config::ScorerConfig;
use crate::utils::text::{contains_phrase, normalize, words};
use serde::Serialize;

/// First-person share of all words at which the pronoun feature saturates.
const PRONOUN_DENSITY_SATURATION: f64 = 0.2;
/// Emotion-word hits at which the emotion feature saturates.
const EMOTION_SATURATION: f64 = 2.0;
/// Introspective-phrase hits at which the introspection feature saturates.
const INTROSPECTION_SATURATION: f64 = 2.0;
/// Word count at which the length feature saturates.
const LENGTH_SATURATION_WORDS: f64 = 60.0;

/// Per-feature view of a heuristic score. Every feature is in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeuristicBreakdown {
    pub word_count: usize,
    pub pronoun: f64,
    pub emotion: f64,
    pub introspection: f64,
    pub length: f64,
    pub ambiguity_markers: usize,
    pub value: f64,
}

pub fn analyze(message: &str, config: &ScorerConfig) -> HeuristicBreakdown {
    let tokens = words(message);
    let normalized = normalize(message);
    let word_count = tokens.len();

    if word_count == 0 {
        return HeuristicBreakdown {
            word_count,
            pronoun: 0.0,
            emotion: 0.0,
            introspection: 0.0,
            length: 0.0,
            ambiguity_markers: 0,
            value: 0.0,
        };
    }

    let first_person = tokens
        .iter()
        .filter(|w| FIRST_PERSON.contains(&w.as_str()))
        .count();
    let emotion_hits = tokens
        .iter()
        .filter(|w| EMOTION_WORDS.contains(&w.as_str()))
        .count();
    let introspection_hits = INTROSPECTIVE_PHRASES
        .iter()
        .filter(|phrase| contains_phrase(&normalized, phrase))
        .count();
    let ambiguity_markers = AMBIGUITY_MARKERS
        .iter()
        .filter(|marker| contains_phrase(&normalized, marker))
        .count();

    let density = first_person as f64 / word_count as f64;
    let pronoun = (density / PRONOUN_DENSITY_SATURATION).min(1.0);
    let emotion = (emotion_hits as f64 / EMOTION_SATURATION).min(1.0);
    let introspection = (introspection_hits as f64 / INTROSPECTION_SATURATION).min(1.0);
    let length = (word_count as f64 / LENGTH_SATURATION_WORDS).min(1.0);

    let weight_sum = config.weight_sum();
    let value = if weight_sum > 0.0 {
        (config.pronoun_weight * pronoun
            + config.emotion_weight * emotion
            + config.introspection_weight * introspection
            + config.length_weight * length)
            / weight_sum
    } else {
        0.0
    };

    HeuristicBreakdown {
        word_count,
        pronoun,
        emotion,
        introspection,
        length,
        ambiguity_markers,
        value: value.clamp(0.0, 1.0),
    }
}
