//! Identity-field capture from free text.
//!
//! Recognizes a self-introduced name ("my name is X", "call me X") and an
//! email address. A token that is clearly an attempt at an email but does
//! not validate is reported as malformed so the gate can count it.

use std::collections::BTreeMap;

pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";

const NAME_PREFIXES: &[&str] = &["my name is ", "my name's ", "call me ", "i am called "];
const MAX_NAME_WORDS: usize = 3;
const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityCapture {
    pub fields: BTreeMap<String, String>,
    /// Raw tokens that looked like identity fields but failed validation.
    pub malformed: Vec<String>,
}

impl IdentityCapture {
    pub fn is_malformed(&self) -> bool {
        !self.malformed.is_empty()
    }
}

pub fn capture(message: &str) -> IdentityCapture {
    let mut out = IdentityCapture::default();

    if let Some(name) = extract_name(message) {
        out.fields.insert(FIELD_NAME.to_string(), name);
    }

    for token in message.split_whitespace() {
        let candidate = token.trim_matches(|c: char| {
            matches!(c, ',' | ';' | ':' | '!' | '?' | '(' | ')' | '<' | '>' | '"' | '\'')
        });
        let candidate = candidate.strip_suffix('.').unwrap_or(candidate);
        if !looks_like_email_attempt(candidate) {
            continue;
        }
        if is_valid_email(candidate) {
            out.fields
                .entry(FIELD_EMAIL.to_string())
                .or_insert_with(|| candidate.to_lowercase());
        } else {
            out.malformed.push(candidate.to_string());
        }
    }

    out
}

fn extract_name(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    NAME_PREFIXES.iter().find_map(|prefix| {
        let start = lower.find(prefix)? + prefix.len();
        // Lowercasing can change byte lengths for non-ASCII input.
        let rest = message.get(start..)?;
        // Words after the first only count when capitalized ("Ada Lovelace",
        // not "Ada and ...").
        let name: Vec<&str> = rest
            .split(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';' | '\n'))
            .next()?
            .split_whitespace()
            .take_while(|w| w.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\''))
            .enumerate()
            .take_while(|(i, w)| *i == 0 || w.chars().next().is_some_and(char::is_uppercase))
            .map(|(_, w)| w)
            .take(MAX_NAME_WORDS)
            .collect();
        if name.is_empty() {
            None
        } else {
            Some(name.join(" "))
        }
    })
}

/// Something before the `@` and a word-ish tail after it. Handles like
/// `@alex` and a bare `@` are ordinary text.
fn looks_like_email_attempt(candidate: &str) -> bool {
    candidate.split_once('@').is_some_and(|(local, tail)| {
        !local.is_empty() && tail.chars().any(char::is_alphanumeric)
    })
}

pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.len() > MAX_EMAIL_LEN || candidate.matches('@').count() != 1 {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    labels_ok && tld_ok
}
