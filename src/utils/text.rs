use std::collections::HashSet;

#[must_use]
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let truncated = &s[..idx];
            format!("{}...", truncated.trim_end())
        }
        None => s.to_string(),
    }
}

/// Lowercase word tokens. Apostrophes stay inside words ("i'm", "don't");
/// every other non-alphanumeric character separates tokens.
pub fn words(s: &str) -> Vec<String> {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

pub fn word_set(s: &str) -> HashSet<String> {
    words(s).into_iter().collect()
}

/// Whitespace-normalized lowercase form used for phrase matching.
pub fn normalize(s: &str) -> String {
    words(s).join(" ")
}

/// Whether `phrase` occurs in `normalized` on word boundaries. Both sides
/// must already be normalized with [`normalize`].
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let padded = format!(" {normalized} ");
    padded.contains(&format!(" {phrase} "))
}
