// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Section Oxide
//!
//! Document structure recovery for scanned technical reports.
//!
//! A page-layout extractor produces a flat stream of positioned text
//! fragments and image blocks. This crate rebuilds the logical structure on
//! top of it:
//!
//! - **Page furniture**: running page numbers at the top or bottom of pages
//! - **Section headers**: staged detection of numbered heading lines (bold
//!   flag, bold font family, non-body font)
//! - **Section chain**: the longest consistent sequence of section numbers,
//!   found by memoized backtracking
//! - **Captions**: figure captions below images
//! - **Paragraphs**: body text partitioned by header, with referenced figures
//!   attached
//!
//! Results degrade gracefully: a document without numbered headings yields no
//! paragraphs, an image without a label yields an uncaptioned record, and a
//! search that runs out of time falls back to a greedy chain.
//!
//! ## Quick Start
//!
//! ```
//! use section_oxide::extractor::DocumentBuilder;
//! use section_oxide::geometry::Rect;
//! use section_oxide::{StructureConfig, StructureRecovery};
//!
//! # fn main() -> Result<(), section_oxide::Error> {
//! let mut builder = DocumentBuilder::default();
//! let row = |y: f32| Rect::from_points(50.0, y, 500.0, y + 12.0);
//! builder.push_text(0, row(10.0), "Times-Bold", 12.0, true, "1 Introduction");
//! builder.push_text(0, row(30.0), "Times", 10.0, false, "Body text.");
//! builder.push_text(0, row(50.0), "Times-Bold", 12.0, true, "2 Results");
//! builder.push_text(0, row(70.0), "Times", 10.0, false, "More text.");
//!
//! let engine = StructureRecovery::new(StructureConfig::default());
//! let structure = engine.recover(&builder.build())?;
//!
//! assert_eq!(structure.paragraphs.len(), 2);
//! assert_eq!(structure.paragraphs[1].text, "More text.");
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license (<http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Layout primitives
pub mod geometry;
pub mod layout;

// Document structure
pub mod structure;

// Text utilities
pub mod text;

// Extractor boundary
pub mod extractor;

// Recovery pipeline
pub mod pipeline;

// Re-exports
pub use config::StructureConfig;
pub use error::{Error, Result};
pub use extractor::{DocumentBuilder, ExtractedDocument, FragmentSource, JsonFragmentSource};
pub use pipeline::{BatchOutcome, DocumentStructure, ResolvedHeader, StructureRecovery};
