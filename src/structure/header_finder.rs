//! Section header candidate detection.
//!
//! Authors style headings inconsistently, so candidates are found with an
//! ordered list of increasingly permissive stages:
//!
//! 1. [`BoldFlagStage`]: fragments the extractor flagged as bold
//! 2. [`BoldFontPrefixStage`]: fragments whose font belongs to a known bold family
//! 3. [`NonBodyFontStage`]: fragments not set in the dominant (body) font
//!
//! The first stage that yields at least one line starting with a section
//! number wins. Every stage scan also locates the abstract and references
//! headings, which bound the body of the document.

use crate::config::StructureConfig;
use crate::layout::fragment::{Fragment, Line};
use crate::layout::line_grouper::group_lines;
use crate::structure::section_number::{is_hsn, SectionNumber};
use indexmap::IndexMap;

/// A line whose first token parses as a section number.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCandidate {
    /// The parsed section number
    pub hsn: SectionNumber,
    /// Index of the line within the winning stage's lines
    pub group_id: u32,
    /// The heading line itself
    pub line: Line,
}

impl HeaderCandidate {
    /// Id of the first fragment of the heading line.
    pub fn start_id(&self) -> u64 {
        self.line.id()
    }
}

/// Outcome of header candidate detection.
#[derive(Debug, Clone, Default)]
pub struct HeaderScan {
    /// Candidates in document order
    pub candidates: Vec<HeaderCandidate>,
    /// First line mentioning the abstract
    pub abstract_boundary_id: Option<u64>,
    /// First line mentioning the references
    pub references_boundary_id: Option<u64>,
    /// Name of the stage that produced the candidates
    pub stage: Option<&'static str>,
}

/// One strategy for picking heading fragments.
///
/// Implementations only select fragments; grouping into lines and section
/// number extraction are shared by all stages.
pub trait HeaderStage: Send + Sync {
    /// Select the fragments this stage considers heading material.
    fn select<'a>(&self, fragments: &'a [Fragment]) -> Vec<&'a Fragment>;

    /// Return the name of this stage for debugging.
    fn name(&self) -> &'static str;
}

/// Fragments carrying the extractor's bold flag.
pub struct BoldFlagStage;

impl HeaderStage for BoldFlagStage {
    fn select<'a>(&self, fragments: &'a [Fragment]) -> Vec<&'a Fragment> {
        fragments.iter().filter(|f| f.bold).collect()
    }

    fn name(&self) -> &'static str {
        "bold-flag"
    }
}

/// Fragments whose font name starts with a bold-family prefix.
///
/// Catches documents whose fonts are bold by design (`CMBX12`) but are not
/// flagged as bold by the extractor.
pub struct BoldFontPrefixStage {
    prefixes: Vec<String>,
}

impl BoldFontPrefixStage {
    /// Create the stage with the given font-name prefixes.
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }
}

impl HeaderStage for BoldFontPrefixStage {
    fn select<'a>(&self, fragments: &'a [Fragment]) -> Vec<&'a Fragment> {
        fragments
            .iter()
            .filter(|f| {
                let font = f.base_font_name();
                self.prefixes.iter().any(|p| font.starts_with(p.as_str()))
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "bold-font-prefix"
    }
}

/// Fragments not set in the document's most frequent font.
pub struct NonBodyFontStage;

impl HeaderStage for NonBodyFontStage {
    fn select<'a>(&self, fragments: &'a [Fragment]) -> Vec<&'a Fragment> {
        match body_font(fragments) {
            Some(body) => fragments.iter().filter(|f| f.font_name != body).collect(),
            None => Vec::new(),
        }
    }

    fn name(&self) -> &'static str {
        "non-body-font"
    }
}

/// The most frequent font name; ties go to the font seen first.
pub fn body_font(fragments: &[Fragment]) -> Option<&str> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for fragment in fragments {
        *counts.entry(fragment.font_name.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (font, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((font, count));
        }
    }
    best.map(|(font, _)| font)
}

/// Header candidate finder running an ordered list of stages.
pub struct HeaderFinder {
    stages: Vec<Box<dyn HeaderStage>>,
    abstract_marker: String,
    references_marker: String,
}

impl HeaderFinder {
    /// Create a finder with the default three stages.
    pub fn new(config: &StructureConfig) -> Self {
        Self::with_stages(
            config,
            vec![
                Box::new(BoldFlagStage),
                Box::new(BoldFontPrefixStage::new(config.bold_font_prefixes.clone())),
                Box::new(NonBodyFontStage),
            ],
        )
    }

    /// Create a finder with a custom stage list.
    pub fn with_stages(config: &StructureConfig, stages: Vec<Box<dyn HeaderStage>>) -> Self {
        Self {
            stages,
            abstract_marker: config.abstract_marker.to_lowercase(),
            references_marker: config.references_marker.to_lowercase(),
        }
    }

    /// Run the stages in order and stop at the first one that finds a candidate.
    ///
    /// If no stage finds one, the candidates are empty and the boundaries come
    /// from the last stage's scan.
    pub fn find(&self, fragments: &[Fragment]) -> HeaderScan {
        let mut last = HeaderScan::default();

        for stage in &self.stages {
            let selected = stage.select(fragments);
            let selected_count = selected.len();
            let scan = self.scan_lines(&group_lines(selected));

            log::debug!(
                "Header stage '{}': {} fragments, {} candidates",
                stage.name(),
                selected_count,
                scan.candidates.len()
            );

            if !scan.candidates.is_empty() {
                return HeaderScan {
                    stage: Some(stage.name()),
                    ..scan
                };
            }
            last = scan;
        }

        last
    }

    /// Extract boundaries and section-numbered lines from one stage's lines.
    fn scan_lines(&self, lines: &[Line]) -> HeaderScan {
        let mut scan = HeaderScan::default();

        for (index, line) in lines.iter().enumerate() {
            let text = line.text();
            let lower = text.to_lowercase();

            if scan.abstract_boundary_id.is_none() && lower.contains(&self.abstract_marker) {
                scan.abstract_boundary_id = Some(line.id());
            }
            if scan.references_boundary_id.is_none() && lower.contains(&self.references_marker) {
                scan.references_boundary_id = Some(line.id());
            }

            let Some(token) = text.split_whitespace().next() else {
                continue;
            };
            if !is_hsn(token) {
                continue;
            }
            match SectionNumber::parse(token) {
                Ok(hsn) => scan.candidates.push(HeaderCandidate {
                    hsn,
                    group_id: index as u32,
                    line: line.clone(),
                }),
                Err(e) => log::debug!("Skipping heading token: {}", e),
            }
        }

        scan
    }
}

/// Find header candidates with the default stages.
pub fn find_header_candidates(fragments: &[Fragment], config: &StructureConfig) -> HeaderScan {
    HeaderFinder::new(config).find(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn mock_fragment(id: u64, text: &str, font: &str, bold: bool, y0: f32) -> Fragment {
        Fragment {
            id,
            text: text.to_string(),
            bbox: Rect::from_points(50.0, y0, 300.0, y0 + 12.0),
            font_name: font.to_string(),
            font_size: 12.0,
            bold,
            page: 0,
        }
    }

    fn titles(scan: &HeaderScan) -> Vec<String> {
        scan.candidates.iter().map(|c| c.line.text()).collect()
    }

    #[test]
    fn test_bold_stage_wins() {
        let fragments = vec![
            mock_fragment(0, "Abstract", "Times-Bold", true, 10.0),
            mock_fragment(1, "We study things.", "Times", false, 30.0),
            mock_fragment(2, "1 Introduction", "Times-Bold", true, 50.0),
            mock_fragment(3, "Text.", "Times", false, 70.0),
            mock_fragment(4, "2 Method", "Times-Bold", true, 90.0),
            mock_fragment(5, "References", "Times-Bold", true, 110.0),
        ];

        let scan = find_header_candidates(&fragments, &StructureConfig::default());

        assert_eq!(scan.stage, Some("bold-flag"));
        assert_eq!(titles(&scan), vec!["1 Introduction", "2 Method"]);
        assert_eq!(scan.candidates[0].group_id, 1);
        assert_eq!(scan.candidates[1].group_id, 2);
        assert_eq!(scan.abstract_boundary_id, Some(0));
        assert_eq!(scan.references_boundary_id, Some(5));
    }

    #[test]
    fn test_falls_back_to_font_prefix() {
        let fragments = vec![
            mock_fragment(0, "1 Scope", "ABCDEF+CMBX12", false, 10.0),
            mock_fragment(1, "Body", "CMR10", false, 30.0),
            mock_fragment(2, "Important", "Times", true, 50.0),
        ];

        let scan = find_header_candidates(&fragments, &StructureConfig::default());

        assert_eq!(scan.stage, Some("bold-font-prefix"));
        assert_eq!(titles(&scan), vec!["1 Scope"]);
    }

    #[test]
    fn test_falls_back_to_non_body_font() {
        let fragments = vec![
            mock_fragment(0, "1 Overview", "Heading", false, 10.0),
            mock_fragment(1, "Body one", "Body", false, 30.0),
            mock_fragment(2, "Body two", "Body", false, 50.0),
            mock_fragment(3, "Body three", "Body", false, 60.0),
            mock_fragment(4, "2 Details", "Heading", false, 70.0),
        ];

        let scan = find_header_candidates(&fragments, &StructureConfig::default());

        assert_eq!(scan.stage, Some("non-body-font"));
        assert_eq!(titles(&scan), vec!["1 Overview", "2 Details"]);
    }

    #[test]
    fn test_no_candidates_keeps_last_stage_boundaries() {
        let fragments = vec![
            mock_fragment(0, "Abstract", "Heading", false, 10.0),
            mock_fragment(1, "Body", "Body", false, 30.0),
            mock_fragment(2, "More body", "Body", false, 50.0),
            mock_fragment(3, "Even more body", "Body", false, 60.0),
            mock_fragment(4, "References", "Heading", false, 70.0),
        ];

        let scan = find_header_candidates(&fragments, &StructureConfig::default());

        assert!(scan.candidates.is_empty());
        assert!(scan.stage.is_none());
        assert_eq!(scan.abstract_boundary_id, Some(0));
        assert_eq!(scan.references_boundary_id, Some(4));
    }

    #[test]
    fn test_five_level_token_is_not_a_candidate() {
        let fragments = vec![
            mock_fragment(0, "1.2.3.4.5 Deep", "Times-Bold", true, 10.0),
            mock_fragment(1, "1 Shallow", "Times-Bold", true, 30.0),
        ];

        let scan = find_header_candidates(&fragments, &StructureConfig::default());

        assert_eq!(titles(&scan), vec!["1 Shallow"]);
    }

    #[test]
    fn test_first_boundary_match_locks() {
        let fragments = vec![
            mock_fragment(0, "Abstract", "Times-Bold", true, 10.0),
            mock_fragment(1, "1 Intro", "Times-Bold", true, 30.0),
            mock_fragment(2, "Abstract again", "Times-Bold", true, 50.0),
        ];

        let scan = find_header_candidates(&fragments, &StructureConfig::default());

        assert_eq!(scan.abstract_boundary_id, Some(0));
        assert_eq!(scan.references_boundary_id, None);
    }

    #[test]
    fn test_body_font_ties_go_to_first_seen() {
        let fragments = vec![
            mock_fragment(0, "a", "A", false, 10.0),
            mock_fragment(1, "b", "B", false, 20.0),
            mock_fragment(2, "c", "B", false, 30.0),
            mock_fragment(3, "d", "A", false, 40.0),
        ];
        assert_eq!(body_font(&fragments), Some("A"));
        assert_eq!(body_font(&[]), None);
    }
}
