//! Configuration for document structure recovery.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of levels a hierarchical section number can carry (`A.B.C.D`).
pub const MAX_SECTION_DEPTH: usize = 4;

/// Structure recovery configuration.
///
/// Every heuristic threshold used by the engine lives here. The defaults match
/// typical scanned technical reports; a JSON file with any subset of the fields
/// can be loaded with [`StructureConfig::from_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Images narrower or shorter than this are discarded before recovery.
    pub min_image_extent: f32,

    /// Sampling stride for page-number furniture (numbers appear on alternating sides).
    pub page_number_stride: usize,

    /// Font-name prefixes that identify a bold family when the bold flag is missing.
    pub bold_font_prefixes: Vec<String>,

    /// Case-insensitive marker of the abstract heading.
    pub abstract_marker: String,

    /// Case-insensitive marker of the references heading.
    pub references_marker: String,

    /// Case-insensitive marker that opens a figure caption.
    pub caption_marker: String,

    /// A caption ends before the first vertical gap larger than this many line heights.
    pub caption_gap_factor: f32,

    /// Wall-clock budget for the section chain search, in milliseconds (`None` = unbounded).
    pub resolution_budget_ms: Option<u64>,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            min_image_extent: 100.0,
            page_number_stride: 2,
            bold_font_prefixes: [
                "CMBX",
                "CMSSBX",
                "Times-Bold",
                "Helvetica-Bold",
                "Arial-Bold",
                "NimbusRomNo9L-Medi",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            abstract_marker: "abstract".to_string(),
            references_marker: "reference".to_string(),
            caption_marker: "fig".to_string(),
            caption_gap_factor: 1.5,
            resolution_budget_ms: Some(5_000),
        }
    }

    /// Load configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.page_number_stride == 0 {
            return Err(crate::error::Error::InvalidInput(
                "page_number_stride must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Set the minimum image extent.
    pub fn with_min_image_extent(mut self, extent: f32) -> Self {
        self.min_image_extent = extent;
        self
    }

    /// Set the page-number sampling stride (values below 1 are clamped to 1).
    pub fn with_page_number_stride(mut self, stride: usize) -> Self {
        self.page_number_stride = stride.max(1);
        self
    }

    /// Replace the bold font-family prefixes.
    pub fn with_bold_font_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bold_font_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the caption gap factor.
    pub fn with_caption_gap_factor(mut self, factor: f32) -> Self {
        self.caption_gap_factor = factor;
        self
    }

    /// Set the chain resolution budget (`None` disables it).
    pub fn with_resolution_budget(mut self, budget: Option<Duration>) -> Self {
        self.resolution_budget_ms = budget.map(|d| d.as_millis() as u64);
        self
    }

    /// Chain resolution budget as a [`Duration`].
    pub fn resolution_budget(&self) -> Option<Duration> {
        self.resolution_budget_ms.map(Duration::from_millis)
    }

    /// Number of levels a section number may carry.
    pub fn max_section_depth(&self) -> usize {
        MAX_SECTION_DEPTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StructureConfig::default();
        assert_eq!(config.min_image_extent, 100.0);
        assert_eq!(config.page_number_stride, 2);
        assert_eq!(config.caption_gap_factor, 1.5);
        assert!(config.bold_font_prefixes.iter().any(|p| p == "CMBX"));
        assert_eq!(config.resolution_budget(), Some(Duration::from_secs(5)));
        assert_eq!(config.max_section_depth(), 4);
    }

    #[test]
    fn test_builder() {
        let config = StructureConfig::new()
            .with_page_number_stride(0)
            .with_caption_gap_factor(2.0)
            .with_bold_font_prefixes(["Heavy"])
            .with_resolution_budget(None);

        assert_eq!(config.page_number_stride, 1);
        assert_eq!(config.caption_gap_factor, 2.0);
        assert_eq!(config.bold_font_prefixes, vec!["Heavy".to_string()]);
        assert!(config.resolution_budget().is_none());
    }

    #[test]
    fn test_from_json_partial() {
        let config = StructureConfig::from_json(r#"{"caption_gap_factor": 2.5}"#).unwrap();
        assert_eq!(config.caption_gap_factor, 2.5);
        assert_eq!(config.abstract_marker, "abstract");
    }

    #[test]
    fn test_from_json_rejects_zero_stride() {
        assert!(StructureConfig::from_json(r#"{"page_number_stride": 0}"#).is_err());
    }
}
