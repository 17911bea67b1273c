//! Body text reconstruction.
//!
//! Paragraph fragments are joined one per line, so a word hyphenated at a line
//! break shows up as `"exam-\nple"`. Reconstruction removes those breaks and
//! collapses the remaining whitespace.

use crate::layout::fragment::Fragment;
use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// In-text figure references: "Figure 3", "Fig. 3", "fig.3", "FIG 3".
    static ref RE_FIGURE_REF: Regex = Regex::new(r"(?i)(?:figure|fig\.?)\s*(\d+)").unwrap();
}

/// Join fragment texts into clean paragraph text.
///
/// # Examples
///
/// ```
/// use section_oxide::text::clean_body_text;
///
/// assert_eq!(clean_body_text(["The exam-", "ple  is", "short."]), "The example is short.");
/// ```
pub fn clean_body_text<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = texts.into_iter().collect::<Vec<_>>().join("\n");
    joined
        .replace("-\n", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean text of a fragment sequence.
pub fn fragments_text(fragments: &[Fragment]) -> String {
    clean_body_text(fragments.iter().map(|f| f.text.as_str()))
}

/// Distinct figure numbers referenced in `text`, in order of first mention.
///
/// # Examples
///
/// ```
/// use section_oxide::text::figure_references;
///
/// let refs = figure_references("See Fig. 2 and Figure 5; fig.2 again.");
/// assert_eq!(refs.into_iter().collect::<Vec<_>>(), vec![2, 5]);
/// ```
pub fn figure_references(text: &str) -> IndexSet<u32> {
    RE_FIGURE_REF
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}
