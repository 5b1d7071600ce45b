//! Word lists for the heuristic depth scorer.

pub(crate) const FIRST_PERSON: &[&str] = &[
    "i", "me", "my", "mine", "myself", "i'm", "i've", "i'd", "i'll", "im", "ive",
];

pub(crate) const EMOTION_WORDS: &[&str] = &[
    "afraid", "alone", "angry", "anxious", "ashamed", "bitter", "broken", "calm", "confused",
    "content", "depressed", "disappointed", "empty", "excited", "exhausted", "fear", "frustrated",
    "grateful", "grief", "guilty", "happy", "heartbroken", "helpless", "hopeful", "hopeless",
    "hurt", "insecure", "jealous", "joy", "lonely", "lost", "love", "miss", "nervous",
    "overwhelmed", "panic", "proud", "regret", "relieved", "sad", "scared", "shame", "stressed",
    "terrified", "tired", "upset", "vulnerable", "worried", "worthless",
];

/// Normalized multi-word markers of self-reflection.
pub(crate) const INTROSPECTIVE_PHRASES: &[&str] = &[
    "i feel",
    "i felt",
    "i wonder",
    "i realize",
    "i realized",
    "i've been thinking",
    "i have been thinking",
    "makes me think",
    "makes me feel",
    "deep down",
    "if i'm honest",
    "to be honest",
    "i never told",
    "i'm afraid",
    "i keep thinking",
    "part of me",
    "i don't know why",
    "i've never",
    "what scares me",
    "i struggle",
];

/// Markers that make a heuristic reading unreliable (hedging, sarcasm,
/// mixed signals). Their presence always escalates when permitted.
pub(crate) const AMBIGUITY_MARKERS: &[&str] = &[
    "i guess",
    "kind of",
    "sort of",
    "not sure",
    "maybe",
    "idk",
    "whatever you say",
    "yeah right",
    "as if",
    "lol",
    "jk",
    "or not",
];
