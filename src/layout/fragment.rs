//! Positioned text fragments, image blocks and visual lines.
//!
//! These are the units handed over by the page-layout extractor. They are
//! immutable once produced; every later stage refers to a fragment by its id.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A positioned run of text with uniform font and style.
///
/// Fragment ids are document-global and strictly increasing in reading order,
/// so comparing ids compares document positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Document-unique sequential id
    pub id: u64,
    /// Whitespace-normalized, non-empty text
    pub text: String,
    /// Bounding box in page space
    pub bbox: Rect,
    /// Font name as reported by the extractor (may carry a subset tag)
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Bold flag reported by the extractor
    #[serde(default)]
    pub bold: bool,
    /// Zero-based page index
    pub page: u32,
}

impl Fragment {
    /// Font name without a PDF subset tag (`ABCDEF+CMBX12` -> `CMBX12`).
    pub fn base_font_name(&self) -> &str {
        strip_subset_tag(&self.font_name)
    }
}

/// An embedded image large enough to be a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Document-unique id
    pub id: u64,
    /// Bounding box in page space
    pub bbox: Rect,
    /// Zero-based page index
    pub page: u32,
    /// Pixel width
    pub width: f32,
    /// Pixel height
    pub height: f32,
    /// Where the caller stored the image bytes, if anywhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

/// Fragments sharing the same top edge, font size and page.
///
/// Members keep their extraction order. A line is identified by the id of its
/// first fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    fragments: Vec<Fragment>,
}

impl Line {
    /// Start a line from its first fragment.
    pub fn new(first: Fragment) -> Self {
        Self {
            fragments: vec![first],
        }
    }

    /// Append a fragment that belongs to this line.
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Member fragments in extraction order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// The representative (first) fragment.
    pub fn first(&self) -> &Fragment {
        // A line is never empty: it is created from its first fragment.
        &self.fragments[0]
    }

    /// Identity of the line: the id of its first fragment.
    pub fn id(&self) -> u64 {
        self.first().id
    }

    /// Page the line sits on.
    pub fn page(&self) -> u32 {
        self.first().page
    }

    /// Whether `fragment` belongs on this line (exact top, size and page match).
    #[allow(clippy::float_cmp)]
    pub fn accepts(&self, fragment: &Fragment) -> bool {
        let first = self.first();
        first.bbox.y0 == fragment.bbox.y0
            && first.font_size == fragment.font_size
            && first.page == fragment.page
    }

    /// Member texts joined with single spaces.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Ids of all member fragments.
    pub fn fragment_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.fragments.iter().map(|f| f.id)
    }
}

/// Remove a `XXXXXX+` subset prefix from a font name.
pub fn strip_subset_tag(font_name: &str) -> &str {
    match font_name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => font_name,
    }
}
