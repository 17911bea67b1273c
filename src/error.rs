//! Error types for the structure recovery engine.
//!
//! Most conditions the engine meets on real documents are not errors: a document
//! without section numbers yields no paragraphs, an image without a caption is
//! kept without one. The variants here cover input that breaks the extractor
//! contract and the resolver's wall-clock valve.

/// Result type alias for structure recovery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while recovering document structure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document produced no text fragments
    #[error("Document contains no text fragments")]
    NoFragments,

    /// Token is not a hierarchical section number
    #[error("Not a section number: '{0}'")]
    InvalidSectionNumber(String),

    /// Section number has more levels (or larger components) than can be represented
    #[error("Section number '{token}' does not fit in {max_levels} levels")]
    SectionNumberOverflow {
        /// The offending token
        token: String,
        /// Maximum number of levels supported
        max_levels: usize,
    },

    /// Fragment ids are not strictly increasing in extraction order
    #[error("Fragment ids must be strictly increasing: {found} follows {previous}")]
    NonMonotonicIds {
        /// Id of the preceding fragment
        previous: u64,
        /// Id that broke the ordering
        found: u64,
    },

    /// Chain resolution ran past its wall-clock budget
    #[error("Section chain resolution exceeded its budget after {elapsed_ms} ms")]
    ResolutionBudgetExceeded {
        /// Time spent before giving up
        elapsed_ms: u128,
    },

    /// Invalid configuration value, or input rejected by a custom source
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
