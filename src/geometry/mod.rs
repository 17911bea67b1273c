//! Geometric primitives for fragment and image positions.
//!
//! Coordinates follow the extractor's page space: the origin is the top-left
//! corner of the page and `y` grows downwards, so `y0` is the top edge of a box.

use serde::{Deserialize, Serialize};

/// A bounding box given by its two corners.
///
/// Serialized as the `[x0, y0, x1, y1]` array produced by the layout extractor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from two corner points.
    ///
    /// # Examples
    ///
    /// ```
    /// use section_oxide::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.height(), 50.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Height of the rectangle (the line height, for a text fragment).
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Vertical midpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use section_oxide::geometry::Rect;
    ///
    /// let image = Rect::from_points(100.0, 100.0, 300.0, 300.0);
    /// assert_eq!(image.mid_y(), 200.0);
    /// ```
    pub fn mid_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }
}

impl From<[f32; 4]> for Rect {
    fn from([x0, y0, x1, y1]: [f32; 4]) -> Self {
        Rect::from_points(x0, y0, x1, y1)
    }
}

impl From<Rect> for [f32; 4] {
    fn from(rect: Rect) -> Self {
        [rect.x0, rect.y0, rect.x1, rect.y1]
    }
}
