//! Grouping of fragments into visual lines.
//!
//! The extractor already quantizes coordinates, so fragments on one visual line
//! carry bit-identical top edges. Grouping therefore uses exact equality on
//! `(y0, font_size, page)` rather than a tolerance.

use crate::layout::fragment::{Fragment, Line};

/// Group fragments into lines, preserving extraction order.
///
/// Each fragment joins the first existing line whose representative matches it,
/// otherwise it opens a new line. Lines are returned in order of their first
/// fragment. The scan over open lines is quadratic in the worst case, which is
/// fine at the scale of a single document.
///
/// # Examples
///
/// ```
/// use section_oxide::geometry::Rect;
/// use section_oxide::layout::{group_lines, Fragment};
///
/// let frag = |id, text: &str, y0| Fragment {
///     id,
///     text: text.to_string(),
///     bbox: Rect::from_points(0.0, y0, 40.0, y0 + 10.0),
///     font_name: "Times".to_string(),
///     font_size: 10.0,
///     bold: false,
///     page: 0,
/// };
///
/// let lines = group_lines(&[frag(0, "1", 50.0), frag(1, "Scope", 50.0), frag(2, "Body", 70.0)]);
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0].text(), "1 Scope");
/// ```
pub fn group_lines<'a, I>(fragments: I) -> Vec<Line>
where
    I: IntoIterator<Item = &'a Fragment>,
{
    let mut lines: Vec<Line> = Vec::new();

    for fragment in fragments {
        match lines.iter_mut().find(|line| line.accepts(fragment)) {
            Some(line) => line.push(fragment.clone()),
            None => lines.push(Line::new(fragment.clone())),
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn mock_fragment(id: u64, y0: f32, size: f32, page: u32) -> Fragment {
        Fragment {
            id,
            text: format!("f{}", id),
            bbox: Rect::from_points(id as f32 * 10.0, y0, id as f32 * 10.0 + 8.0, y0 + size),
            font_name: "Times".to_string(),
            font_size: size,
            bold: false,
            page,
        }
    }

    #[test]
    fn test_empty_input() {
        let fragments: Vec<Fragment> = Vec::new();
        let lines = group_lines(&fragments);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_groups_by_top_size_and_page() {
        let fragments = vec![
            mock_fragment(0, 10.0, 12.0, 0),
            mock_fragment(1, 10.0, 12.0, 0),
            mock_fragment(2, 10.0, 9.0, 0),  // same top, different size
            mock_fragment(3, 10.0, 12.0, 1), // same top, different page
            mock_fragment(4, 30.0, 12.0, 0),
        ];

        let lines = group_lines(&fragments);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].fragment_ids().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(lines[1].id(), 2);
        assert_eq!(lines[2].id(), 3);
        assert_eq!(lines[3].id(), 4);
    }

    #[test]
    fn test_non_adjacent_members_join_first_group() {
        // Two columns sharing a baseline: the right-hand fragment comes later in
        // extraction order but still joins the line opened by the left one.
        let fragments = vec![
            mock_fragment(0, 10.0, 12.0, 0),
            mock_fragment(1, 30.0, 12.0, 0),
            mock_fragment(2, 10.0, 12.0, 0),
        ];

        let lines = group_lines(&fragments);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].fragment_ids().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(lines[1].fragment_ids().collect::<Vec<_>>(), vec![1]);
    }
}
