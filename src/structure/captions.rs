//! Figure caption matching.
//!
//! Captions in the target documents sit below their figure and open with a
//! "Fig."/"Figure" label. A caption runs over consecutive lines until the first
//! vertical gap clearly larger than the caption's own line height.

use crate::layout::fragment::{Fragment, ImageBlock};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref RE_FIRST_NUMBER: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// An image together with its caption, if one could be resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Caption {
    /// Id of the captioned image
    pub image_id: u64,
    /// Page of the image
    pub page: u32,
    /// Figure number from the caption label
    pub figure_number: Option<u32>,
    /// Caption fragments in extraction order
    #[serde(skip)]
    pub caption_lines: Vec<Fragment>,
    /// Caption fragment texts joined with spaces
    pub description: String,
    /// Where the image bytes were stored by the extractor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl Caption {
    /// A record for an image whose caption could not be resolved.
    pub fn uncaptioned(image: &ImageBlock) -> Self {
        Self {
            image_id: image.id,
            page: image.page,
            figure_number: None,
            caption_lines: Vec::new(),
            description: String::new(),
            image_ref: image.image_ref.clone(),
        }
    }

    /// Whether a caption was found for the image.
    pub fn is_resolved(&self) -> bool {
        self.figure_number.is_some()
    }

    /// Ids of the caption fragments.
    pub fn fragment_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.caption_lines.iter().map(|f| f.id)
    }
}

/// Caption matcher parameters.
#[derive(Debug, Clone)]
pub struct CaptionMatcher {
    marker: String,
    gap_factor: f32,
}

impl Default for CaptionMatcher {
    fn default() -> Self {
        Self::new("fig", 1.5)
    }
}

impl CaptionMatcher {
    /// Create a matcher with a label marker and a gap factor.
    pub fn new(marker: &str, gap_factor: f32) -> Self {
        Self {
            marker: marker.to_lowercase(),
            gap_factor,
        }
    }

    /// Find the caption of `image` among the fragments of its page.
    ///
    /// Only fragments whose top edge is at or below the image's vertical
    /// midpoint are considered, which tolerates slight overlap between image
    /// and text boxes. The first of them containing the marker opens the
    /// caption; the first number in it is the figure number. Fragments are
    /// taken in extraction order and are not re-sorted.
    ///
    /// Returns `None` when there is no label or the label has no number.
    pub fn match_caption<'a, I>(&self, image: &ImageBlock, page_fragments: I) -> Option<Caption>
    where
        I: IntoIterator<Item = &'a Fragment>,
    {
        let midpoint = image.bbox.mid_y();
        let below: Vec<&Fragment> = page_fragments
            .into_iter()
            .filter(|f| f.page == image.page && f.bbox.y0 >= midpoint)
            .collect();

        let start = below
            .iter()
            .position(|f| f.text.to_lowercase().contains(&self.marker))?;
        let figure_number: u32 = RE_FIRST_NUMBER
            .find(&below[start].text)
            .and_then(|m| m.as_str().parse().ok())?;

        let line_height = below[start].bbox.height();
        let max_gap = self.gap_factor * line_height;

        let mut end = start;
        while end + 1 < below.len() {
            let gap = below[end + 1].bbox.y0 - below[end].bbox.y0;
            if gap > max_gap {
                break;
            }
            end += 1;
        }

        let caption_lines: Vec<Fragment> = below[start..=end].iter().map(|f| (*f).clone()).collect();
        let description = caption_lines
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        log::debug!(
            "Image {} on page {}: figure {} ({} caption fragments)",
            image.id,
            image.page,
            figure_number,
            caption_lines.len()
        );

        Some(Caption {
            image_id: image.id,
            page: image.page,
            figure_number: Some(figure_number),
            caption_lines,
            description,
            image_ref: image.image_ref.clone(),
        })
    }

    /// Match a caption, or produce an uncaptioned record for the image.
    pub fn caption_or_bare<'a, I>(&self, image: &ImageBlock, page_fragments: I) -> Caption
    where
        I: IntoIterator<Item = &'a Fragment>,
    {
        self.match_caption(image, page_fragments)
            .unwrap_or_else(|| Caption::uncaptioned(image))
    }
}

/// Match a caption with the default marker and gap factor.
pub fn match_caption(image: &ImageBlock, page_fragments: &[Fragment]) -> Option<Caption> {
    CaptionMatcher::default().match_caption(image, page_fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn mock_image() -> ImageBlock {
        ImageBlock {
            id: 100,
            bbox: Rect::from_points(100.0, 100.0, 300.0, 300.0),
            page: 0,
            width: 200.0,
            height: 200.0,
            image_ref: Some("img/100.png".to_string()),
        }
    }

    fn mock_fragment(id: u64, text: &str, y0: f32) -> Fragment {
        Fragment {
            id,
            text: text.to_string(),
            bbox: Rect::from_points(100.0, y0, 300.0, y0 + 12.0),
            font_name: "Times".to_string(),
            font_size: 10.0,
            bold: false,
            page: 0,
        }
    }

    #[test]
    fn test_caption_ends_at_large_gap() {
        let fragments = vec![
            mock_fragment(1, "Fig. 3. Robot", 310.0),
            mock_fragment(2, "chassis design.", 325.0),
            mock_fragment(3, "Next paragraph", 400.0),
        ];

        let caption = match_caption(&mock_image(), &fragments).unwrap();

        assert_eq!(caption.figure_number, Some(3));
        assert_eq!(caption.fragment_ids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(caption.description, "Fig. 3. Robot chassis design.");
        assert_eq!(caption.image_ref.as_deref(), Some("img/100.png"));
    }

    #[test]
    fn test_fragments_above_midpoint_are_ignored() {
        let fragments = vec![
            mock_fragment(1, "Figure 9 label inside image", 150.0),
            mock_fragment(2, "Figure 4: Layout", 305.0),
        ];

        let caption = match_caption(&mock_image(), &fragments).unwrap();

        assert_eq!(caption.figure_number, Some(4));
        assert_eq!(caption.fragment_ids().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_midpoint_is_inclusive() {
        let fragments = vec![mock_fragment(1, "FIG 2", 200.0)];
        let caption = match_caption(&mock_image(), &fragments).unwrap();
        assert_eq!(caption.figure_number, Some(2));
    }

    #[test]
    fn test_no_label_means_no_caption() {
        let fragments = vec![mock_fragment(1, "Plain text below", 310.0)];
        assert!(match_caption(&mock_image(), &fragments).is_none());
    }

    #[test]
    fn test_label_without_number_means_no_caption() {
        let fragments = vec![mock_fragment(1, "Figure: overview", 310.0)];
        assert!(match_caption(&mock_image(), &fragments).is_none());
    }

    #[test]
    fn test_figure_number_skips_non_ascii_digits() {
        let fragments = vec![mock_fragment(1, "Fig. ٣ (panel 5) Arm", 310.0)];
        let caption = match_caption(&mock_image(), &fragments).unwrap();
        assert_eq!(caption.figure_number, Some(5));
    }

    #[test]
    fn test_nothing_below_image() {
        let fragments = vec![mock_fragment(1, "Fig. 1 Above", 50.0)];
        let image = mock_image();
        let record = CaptionMatcher::default().caption_or_bare(&image, &fragments);
        assert!(!record.is_resolved());
        assert_eq!(record.image_id, 100);
        assert!(record.description.is_empty());
    }

    #[test]
    fn test_caption_runs_to_last_fragment() {
        let fragments = vec![
            mock_fragment(1, "Fig. 7 A long", 310.0),
            mock_fragment(2, "caption that", 322.0),
            mock_fragment(3, "continues.", 334.0),
        ];
        let caption = match_caption(&mock_image(), &fragments).unwrap();
        assert_eq!(caption.caption_lines.len(), 3);
    }
}
