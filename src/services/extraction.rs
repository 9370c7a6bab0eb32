//! Text heuristics for the local fallback path.
//!
//! Both functions are pure: the same text always yields the same answer.

use crate::models::identity::ExtractedName;

/// Labels that introduce the holder's name on common Philippine IDs.
const NAME_LABELS: &[&str] = &["name", "bearer", "cardholder"];

/// Case-insensitive substring test. A blank token never matches.
pub fn contains_locality(text: &str, token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }
    text.to_lowercase().contains(&token.to_lowercase())
}

/// Pull `{first, middle, last}` from the first labelled line carrying at
/// least two name tokens.
///
/// The label and anything before it are dropped, along with leading
/// separators such as `:` or `-`. Returns an empty name when nothing fits.
pub fn extract_name(text: &str) -> ExtractedName {
    text.lines()
        .filter_map(strip_label)
        .find_map(split_name)
        .unwrap_or_default()
}

fn strip_label(line: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets aligned with `line`.
    let lower = line.to_ascii_lowercase();
    let (pos, label) = NAME_LABELS
        .iter()
        .filter_map(|label| lower.find(label).map(|pos| (pos, *label)))
        .min_by_key(|(pos, _)| *pos)?;

    Some(&line[pos + label.len()..])
}

fn split_name(rest: &str) -> Option<ExtractedName> {
    let tokens: Vec<&str> = rest
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| matches!(c, ':' | '-' | ',' | '.' | ';')))
        .filter(|t| !t.is_empty())
        .collect();

    match tokens.as_slice() {
        [first, middle @ .., last] => Some(ExtractedName::new(*first, middle.join(" "), *last)),
        _ => None,
    }
}
