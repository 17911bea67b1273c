//! Document structure recovery.
//!
//! This module turns a flat, id-ordered fragment stream into a section
//! hierarchy:
//!
//! - [`section_number`]: hierarchical section numbers and their ordering
//! - [`header_finder`]: staged detection of numbered heading lines
//! - [`chain_resolver`]: longest consistent chain of section numbers
//! - [`captions`]: figure caption matching below images
//! - [`paragraphs`]: assignment of body text to headers

pub mod captions;
pub mod chain_resolver;
pub mod header_finder;
pub mod paragraphs;
pub mod section_number;

pub use captions::{match_caption, Caption, CaptionMatcher};
pub use chain_resolver::{greedy_chain, prefilter_candidates, ChainResolver};
pub use header_finder::{
    body_font, find_header_candidates, BoldFlagStage, BoldFontPrefixStage, HeaderCandidate,
    HeaderFinder, HeaderScan, HeaderStage, NonBodyFontStage,
};
pub use paragraphs::{assemble_paragraphs, ExclusionMask, Paragraph};
pub use section_number::{is_hsn, SectionNumber};
