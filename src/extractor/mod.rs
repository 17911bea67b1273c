//! Boundary with the page-layout extractor.
//!
//! The engine does not decode pages itself. A [`FragmentSource`] hands over
//! the text fragments and image blocks of one document, ordered by id. Two
//! sources ship with the crate: [`DocumentBuilder`] for callers that drive an
//! extractor directly, and [`JsonFragmentSource`] for extractor dumps on disk.

use crate::config::StructureConfig;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::layout::fragment::{Fragment, ImageBlock};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A source of extracted document content.
pub trait FragmentSource: Send + Sync {
    /// Identity of the document, used in logs and batch reports.
    fn document_id(&self) -> String;

    /// Extract fragments and images.
    fn extract(&self) -> Result<ExtractedDocument>;
}

/// Text fragments and image blocks of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Fragments ordered by id
    pub fragments: Vec<Fragment>,
    /// Image blocks ordered by id
    #[serde(default)]
    pub images: Vec<ImageBlock>,
}

impl ExtractedDocument {
    /// Check the id invariant: fragment ids strictly increase.
    pub fn validate(&self) -> Result<()> {
        for pair in self.fragments.windows(2) {
            if pair[1].id <= pair[0].id {
                return Err(Error::NonMonotonicIds {
                    previous: pair[0].id,
                    found: pair[1].id,
                });
            }
        }
        Ok(())
    }

    /// Fragments on one page, in extraction order.
    pub fn page_fragments(&self, page: u32) -> impl Iterator<Item = &Fragment> + '_ {
        self.fragments.iter().filter(move |f| f.page == page)
    }

    /// Drop images smaller than `min_extent` in either dimension.
    pub fn retain_significant_images(&mut self, min_extent: f32) {
        self.images
            .retain(|image| image.width >= min_extent && image.height >= min_extent);
    }
}

/// Per-document id counter.
///
/// Each document gets its own allocator so that concurrent extractions never
/// share a counter.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator starting at zero.
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Hand out the next id.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Builds an [`ExtractedDocument`] from extractor callbacks, enforcing the
/// boundary rules: whitespace is normalized, empty fragments and small images
/// are discarded, and ids are assigned in call order.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    ids: IdAllocator,
    min_image_extent: f32,
    document: ExtractedDocument,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(&StructureConfig::default())
    }
}

impl DocumentBuilder {
    /// Create a builder using the configuration's image threshold.
    pub fn new(config: &StructureConfig) -> Self {
        Self {
            ids: IdAllocator::new(),
            min_image_extent: config.min_image_extent,
            document: ExtractedDocument::default(),
        }
    }

    /// Add a text fragment. Returns its id, or `None` if it was empty.
    pub fn push_text(
        &mut self,
        page: u32,
        bbox: Rect,
        font_name: &str,
        font_size: f32,
        bold: bool,
        text: &str,
    ) -> Option<u64> {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return None;
        }
        let id = self.ids.next_id();
        self.document.fragments.push(Fragment {
            id,
            text,
            bbox,
            font_name: font_name.to_string(),
            font_size,
            bold,
            page,
        });
        Some(id)
    }

    /// Add an image block. Returns its id, or `None` if it was too small.
    pub fn push_image(
        &mut self,
        page: u32,
        bbox: Rect,
        width: f32,
        height: f32,
        image_ref: Option<String>,
    ) -> Option<u64> {
        if width < self.min_image_extent || height < self.min_image_extent {
            log::trace!("Discarding {}x{} image on page {}", width, height, page);
            return None;
        }
        let id = self.ids.next_id();
        self.document.images.push(ImageBlock {
            id,
            bbox,
            page,
            width,
            height,
            image_ref,
        });
        Some(id)
    }

    /// Finish the document.
    pub fn build(self) -> ExtractedDocument {
        self.document
    }
}

/// Reads an extractor dump in JSON form.
///
/// The expected layout is `{"fragments": [...], "images": [...]}` with boxes
/// given as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone)]
pub struct JsonFragmentSource {
    path: PathBuf,
    min_image_extent: f32,
}

impl JsonFragmentSource {
    /// Create a source for one dump file.
    pub fn new<P: AsRef<Path>>(path: P, config: &StructureConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            min_image_extent: config.min_image_extent,
        }
    }

    /// Path of the dump file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a dump from a string.
    pub fn parse(json: &str, min_image_extent: f32) -> Result<ExtractedDocument> {
        let mut document: ExtractedDocument = serde_json::from_str(json)?;
        document.validate()?;
        document.fragments.retain(|f| !f.text.trim().is_empty());
        document.retain_significant_images(min_image_extent);
        Ok(document)
    }
}

impl FragmentSource for JsonFragmentSource {
    fn document_id(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn extract(&self) -> Result<ExtractedDocument> {
        let json = fs::read_to_string(&self.path)?;
        Self::parse(&json, self.min_image_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(y0: f32) -> Rect {
        Rect::from_points(0.0, y0, 100.0, y0 + 10.0)
    }

    #[test]
    fn test_id_allocator_is_sequential() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }

    #[test]
    fn test_builder_normalizes_and_skips_empty() {
        let mut builder = DocumentBuilder::default();
        assert_eq!(builder.push_text(0, bbox(0.0), "Times", 10.0, false, "  a \n b "), Some(0));
        assert_eq!(builder.push_text(0, bbox(20.0), "Times", 10.0, false, " \t "), None);
        assert_eq!(builder.push_text(0, bbox(40.0), "Times", 10.0, false, "c"), Some(1));

        let document = builder.build();
        assert_eq!(document.fragments.len(), 2);
        assert_eq!(document.fragments[0].text, "a b");
        assert!(document.validate().is_ok());
    }

    #[test]
    fn test_builder_discards_small_images() {
        let mut builder = DocumentBuilder::default();
        assert_eq!(builder.push_image(0, bbox(0.0), 99.0, 400.0, None), None);
        assert_eq!(builder.push_image(0, bbox(0.0), 100.0, 100.0, None), Some(0));
        assert_eq!(builder.build().images.len(), 1);
    }

    #[test]
    fn test_validate_rejects_non_monotonic_ids() {
        let mut builder = DocumentBuilder::default();
        builder.push_text(0, bbox(0.0), "Times", 10.0, false, "a");
        builder.push_text(0, bbox(20.0), "Times", 10.0, false, "b");
        let mut document = builder.build();
        document.fragments[1].id = 0;

        assert!(matches!(
            document.validate(),
            Err(Error::NonMonotonicIds { previous: 0, found: 0 })
        ));
    }

    #[test]
    fn test_parse_json_dump() {
        let json = r#"{
            "fragments": [
                {"id": 3, "text": "1 Scope", "bbox": [50, 60, 200, 72], "font_name": "Arial-Bold", "font_size": 12, "bold": true, "page": 0},
                {"id": 7, "text": "Body", "bbox": [50, 80, 200, 92], "font_name": "Arial", "font_size": 10, "page": 0}
            ],
            "images": [
                {"id": 9, "bbox": [0, 100, 300, 400], "page": 0, "width": 300, "height": 300},
                {"id": 10, "bbox": [0, 0, 10, 10], "page": 0, "width": 10, "height": 10}
            ]
        }"#;

        let document = JsonFragmentSource::parse(json, 100.0).unwrap();
        assert_eq!(document.fragments.len(), 2);
        assert_eq!(document.images.len(), 1);
        assert_eq!(document.images[0].id, 9);
        assert_eq!(document.page_fragments(0).count(), 2);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            JsonFragmentSource::parse("{\"fragments\": 3}", 100.0),
            Err(Error::Json(_))
        ));
    }
}
