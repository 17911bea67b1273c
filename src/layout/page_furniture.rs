//! Detection of running page numbers.
//!
//! Scanned reports often print the page number as the first line of a page
//! (top numbering) or the last line (bottom numbering). Only alternating pages
//! are sampled: running titles on facing pages sometimes end in a number that
//! happens to match the page, but such titles rarely match on every other page
//! in lockstep with the page index.

use crate::layout::fragment::Line;
use serde::Serialize;
use std::collections::BTreeSet;

/// Result of page-number furniture detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageFurniture {
    /// The first line of sampled pages carries the page number
    pub has_top_numbers: bool,
    /// The last line of sampled pages carries the page number
    pub has_bottom_numbers: bool,
    /// Fragment ids to exclude from paragraph bodies
    pub excluded_ids: BTreeSet<u64>,
}

impl PageFurniture {
    /// Whether a fragment is page furniture.
    pub fn contains(&self, fragment_id: u64) -> bool {
        self.excluded_ids.contains(&fragment_id)
    }
}

/// Detect page-number lines at page boundaries.
///
/// A page boundary is any index where consecutive lines change page. The line
/// after a boundary is a top candidate and the line before it a bottom
/// candidate. The top hypothesis holds when every `stride`-th top candidate
/// (starting from the first) begins with `page + 1`; the bottom hypothesis uses
/// the last token of bottom candidates. A single mismatch or unparsable token
/// falsifies a hypothesis, and a hypothesis with nothing to sample is false.
///
/// When both hypotheses hold only the sampled candidates are excluded; when
/// exactly one holds every candidate on that side is excluded.
pub fn detect_page_furniture(lines: &[Line], stride: usize) -> PageFurniture {
    let stride = stride.max(1);

    let boundaries: Vec<usize> = (1..lines.len())
        .filter(|&i| lines[i].page() != lines[i - 1].page())
        .collect();

    let top: Vec<&Line> = boundaries.iter().map(|&i| &lines[i]).collect();
    let bottom: Vec<&Line> = boundaries.iter().map(|&i| &lines[i - 1]).collect();

    let has_top_numbers = numbering_holds(&top, stride, |text| {
        text.split_whitespace().next().map(str::to_string)
    });
    let has_bottom_numbers = numbering_holds(&bottom, stride, |text| {
        text.split_whitespace().last().map(str::to_string)
    });

    log::debug!(
        "Page furniture: {} boundaries, top numbering={}, bottom numbering={}",
        boundaries.len(),
        has_top_numbers,
        has_bottom_numbers
    );

    let mut excluded_ids = BTreeSet::new();
    let mut exclude = |candidates: &[&Line], step: usize| {
        for line in candidates.iter().step_by(step) {
            excluded_ids.extend(line.fragment_ids());
        }
    };

    match (has_top_numbers, has_bottom_numbers) {
        (true, true) => {
            exclude(&top[..], stride);
            exclude(&bottom[..], stride);
        },
        (true, false) => exclude(&top[..], 1),
        (false, true) => exclude(&bottom[..], 1),
        (false, false) => {},
    }

    PageFurniture {
        has_top_numbers,
        has_bottom_numbers,
        excluded_ids,
    }
}

/// Check that every `stride`-th candidate's token equals its page index + 1.
fn numbering_holds<F>(candidates: &[&Line], stride: usize, token: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let mut sampled = 0usize;

    for line in candidates.iter().step_by(stride) {
        let expected = u64::from(line.page()) + 1;
        let matches = token(&line.text())
            .and_then(|t| t.parse::<u64>().ok())
            .is_some_and(|n| n == expected);
        if !matches {
            return false;
        }
        sampled += 1;
    }

    sampled > 0
}
