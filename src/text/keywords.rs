//! Keyword normalization for search indexing.

use indexmap::IndexSet;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "in", "is", "it", "its",
    "of", "on", "or", "that", "the", "this", "to", "was", "were", "which", "with",
];

/// Normalize text into distinct lower-case keywords, in order of first use.
///
/// Tokens are split on anything that is not alphanumeric or an intra-word
/// hyphen. Single-character tokens and common English stop words are dropped.
///
/// # Examples
///
/// ```
/// use section_oxide::text::normalize_keywords;
///
/// let keywords = normalize_keywords("The Robot-Arm and the robot-arm's gripper.");
/// assert_eq!(keywords, vec!["robot-arm", "gripper"]);
/// ```
pub fn normalize_keywords(text: &str) -> Vec<String> {
    let mut keywords: IndexSet<String> = IndexSet::new();

    for raw in text.split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\'')) {
        let token = raw
            .split('\'')
            .next()
            .unwrap_or("")
            .trim_matches('-')
            .to_lowercase();
        if token.chars().count() < 2 || STOP_WORDS.contains(&token.as_str()) {
            continue;
        }
        keywords.insert(token);
    }

    keywords.into_iter().collect()
}
