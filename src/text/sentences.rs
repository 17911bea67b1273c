//! Sentence boundary splitting.
//!
//! A sentence ends at `.`, `!` or `?` followed by whitespace and an upper-case
//! letter or a digit. Abbreviations common in technical reports ("Fig.",
//! "et al.", "e.g.") and single-letter initials do not end a sentence.

const ABBREVIATIONS: &[&str] = &[
    "fig.", "figs.", "eq.", "eqs.", "al.", "e.g.", "i.e.", "cf.", "vs.", "no.", "sec.", "ref.",
    "refs.", "approx.", "dr.", "mr.", "mrs.", "prof.", "vol.", "pp.",
];

/// Split paragraph text into trimmed sentences.
///
/// # Examples
///
/// ```
/// use section_oxide::text::split_sentences;
///
/// let sentences = split_sentences("The arm is shown in Fig. 2. It has 6 joints. Why? Cost.");
/// assert_eq!(sentences, vec!["The arm is shown in Fig. 2.", "It has 6 joints.", "Why?", "Cost."]);
/// ```
pub fn split_sentences(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut sentences = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, &word) in words.iter().enumerate() {
        current.push(word);
        let next = words.get(i + 1);
        if next.is_some_and(|n| starts_sentence(n)) && ends_sentence(word) {
            sentences.push(current.join(" "));
            current.clear();
        }
    }

    if !current.is_empty() {
        sentences.push(current.join(" "));
    }

    sentences
}

fn ends_sentence(word: &str) -> bool {
    let trimmed = word.trim_end_matches(['"', '\'', ')', ']']);
    if !trimmed.ends_with(['.', '!', '?']) {
        return false;
    }
    if trimmed.ends_with('.') {
        let lower = trimmed.to_lowercase();
        if ABBREVIATIONS.contains(&lower.as_str()) {
            return false;
        }
        // Initials such as "J." in "J. Smith".
        let stem = &trimmed[..trimmed.len() - 1];
        if stem.chars().count() == 1 && stem.chars().all(|c| c.is_uppercase()) {
            return false;
        }
    }
    true
}

fn starts_sentence(word: &str) -> bool {
    word.trim_start_matches(['"', '\'', '(', '['])
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        assert_eq!(split_sentences("One. Two! Three?"), vec!["One.", "Two!", "Three?"]);
    }

    #[test]
    fn test_no_split_before_lowercase() {
        assert_eq!(split_sentences("Values approx. equal and so on."), vec!["Values approx. equal and so on."]);
        assert_eq!(split_sentences("It ends. then continues."), vec!["It ends. then continues."]);
    }

    #[test]
    fn test_abbreviations_and_initials() {
        let text = "Smith et al. Showed this. See J. Doe for details.";
        assert_eq!(split_sentences(text), vec!["Smith et al. Showed this.", "See J. Doe for details."]);
    }

    #[test]
    fn test_digit_starts_sentence() {
        assert_eq!(split_sentences("Done. 42 tests ran."), vec!["Done.", "42 tests ran."]);
    }

    #[test]
    fn test_empty_text() {
        assert!(split_sentences("   ").is_empty());
    }
}
