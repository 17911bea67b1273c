//! Light text utilities for paragraph output.
//!
//! - [`cleanup`]: body text reconstruction and figure references
//! - [`sentences`]: sentence boundary splitting
//! - [`keywords`]: keyword normalization for downstream search

pub mod cleanup;
pub mod keywords;
pub mod sentences;

pub use cleanup::{clean_body_text, figure_references};
pub use keywords::normalize_keywords;
pub use sentences::split_sentences;
