//! Structure recovery pipeline.
//!
//! ```text
//! ExtractedDocument (fragments + images, ordered by id)
//!     ↓
//! [group_lines] ──→ [detect_page_furniture]
//!     ↓
//! [HeaderFinder] (staged) → [ChainResolver] (greedy fallback on budget)
//!     ↓
//! [CaptionMatcher] (every image)
//!     ↓
//! [assemble_paragraphs] (exclusion mask)
//!     ↓
//! DocumentStructure
//! ```
//!
//! Every call owns its own state, so documents can be processed in parallel
//! with [`StructureRecovery::recover_batch`].

use crate::config::StructureConfig;
use crate::error::{Error, Result};
use crate::extractor::{ExtractedDocument, FragmentSource};
use crate::layout::line_grouper::group_lines;
use crate::layout::page_furniture::{detect_page_furniture, PageFurniture};
use crate::structure::captions::{Caption, CaptionMatcher};
use crate::structure::chain_resolver::{greedy_chain, ChainResolver};
use crate::structure::header_finder::{HeaderCandidate, HeaderFinder};
use crate::structure::paragraphs::{assemble_paragraphs, ExclusionMask, Paragraph};
use rayon::prelude::*;
use serde::Serialize;

/// An accepted section heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedHeader {
    /// Heading line text
    pub title: String,
    /// Section number as displayed (trailing zeros elided)
    pub section: String,
    /// Id of the first fragment of the heading line
    pub line_id: u64,
}

impl From<&HeaderCandidate> for ResolvedHeader {
    fn from(candidate: &HeaderCandidate) -> Self {
        Self {
            title: candidate.line.text(),
            section: candidate.hsn.to_string(),
            line_id: candidate.start_id(),
        }
    }
}

/// Recovered structure of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStructure {
    /// One paragraph per accepted header, in document order
    pub paragraphs: Vec<Paragraph>,
    /// One record per image, in image id order
    pub captions: Vec<Caption>,
    /// Accepted headers in document order
    pub headers: Vec<ResolvedHeader>,
    /// Page-number furniture
    pub furniture: PageFurniture,
    /// Id of the abstract heading line, if found
    pub abstract_boundary_id: Option<u64>,
    /// Id of the references heading line, if found
    pub references_boundary_id: Option<u64>,
    /// Header stage that produced the candidates
    pub header_stage: Option<&'static str>,
    /// Whether the chain came from the greedy fallback
    pub degraded: bool,
}

impl DocumentStructure {
    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of images with a resolved caption.
    pub fn captioned_count(&self) -> usize {
        self.captions.iter().filter(|c| c.is_resolved()).count()
    }
}

/// Result of processing one document in a batch.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Structure was recovered
    Recovered {
        /// Document identity
        document_id: String,
        /// Recovered structure
        structure: Box<DocumentStructure>,
    },
    /// Document was skipped
    Skipped {
        /// Document identity
        document_id: String,
        /// Why the document was skipped
        reason: String,
    },
}

impl BatchOutcome {
    /// Document identity.
    pub fn document_id(&self) -> &str {
        match self {
            BatchOutcome::Recovered { document_id, .. } => document_id,
            BatchOutcome::Skipped { document_id, .. } => document_id,
        }
    }

    /// Whether the document was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, BatchOutcome::Skipped { .. })
    }
}

/// The structure recovery engine.
///
/// Holds only configuration and stateless stage objects; it can be shared
/// between threads.
pub struct StructureRecovery {
    config: StructureConfig,
    header_finder: HeaderFinder,
    resolver: ChainResolver,
    caption_matcher: CaptionMatcher,
}

impl StructureRecovery {
    /// Create an engine with the given configuration.
    pub fn new(config: StructureConfig) -> Self {
        let header_finder = HeaderFinder::new(&config);
        let resolver = ChainResolver::with_budget(config.resolution_budget());
        let caption_matcher = CaptionMatcher::new(&config.caption_marker, config.caption_gap_factor);
        Self {
            config,
            header_finder,
            resolver,
            caption_matcher,
        }
    }

    /// Replace the header finder, e.g. to add a custom stage.
    pub fn with_header_finder(mut self, header_finder: HeaderFinder) -> Self {
        self.header_finder = header_finder;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// Recover the structure of one document.
    ///
    /// # Errors
    ///
    /// - [`Error::NoFragments`] if the document has no text fragments
    /// - [`Error::NonMonotonicIds`] if fragment ids are not strictly increasing
    pub fn recover(&self, document: &ExtractedDocument) -> Result<DocumentStructure> {
        if document.fragments.is_empty() {
            return Err(Error::NoFragments);
        }
        document.validate()?;

        let lines = group_lines(&document.fragments);
        let furniture = detect_page_furniture(&lines, self.config.page_number_stride);
        log::debug!(
            "{} lines, page numbers top={} bottom={}",
            lines.len(),
            furniture.has_top_numbers,
            furniture.has_bottom_numbers
        );

        let scan = self.header_finder.find(&document.fragments);
        let (chain, degraded) = match self.resolver.resolve(&scan.candidates) {
            Ok(chain) => (chain, false),
            Err(Error::ResolutionBudgetExceeded { elapsed_ms }) => {
                log::warn!(
                    "Chain search gave up after {} ms over {} candidates, using greedy chain",
                    elapsed_ms,
                    scan.candidates.len()
                );
                (greedy_chain(&scan.candidates), true)
            },
            Err(e) => return Err(e),
        };

        let captions: Vec<Caption> = document
            .images
            .iter()
            .map(|image| {
                self.caption_matcher
                    .caption_or_bare(image, document.page_fragments(image.page))
            })
            .collect();

        let mask = ExclusionMask::from_parts(
            &furniture,
            &captions,
            &chain,
            scan.abstract_boundary_id,
            scan.references_boundary_id,
        );
        let paragraphs = assemble_paragraphs(&document.fragments, &chain, &mask, &captions);

        Ok(DocumentStructure {
            paragraphs,
            captions,
            headers: chain.iter().map(ResolvedHeader::from).collect(),
            furniture,
            abstract_boundary_id: scan.abstract_boundary_id,
            references_boundary_id: scan.references_boundary_id,
            header_stage: scan.stage,
            degraded,
        })
    }

    /// Extract and recover one document from a source.
    pub fn recover_source<S: FragmentSource + ?Sized>(&self, source: &S) -> Result<DocumentStructure> {
        let document = source.extract()?;
        self.recover(&document)
    }

    /// Recover many documents in parallel.
    ///
    /// A failing document is logged and reported as
    /// [`BatchOutcome::Skipped`]; it never aborts the batch. Outcomes are
    /// returned in input order.
    pub fn recover_batch<S: FragmentSource>(&self, sources: &[S]) -> Vec<BatchOutcome> {
        sources
            .par_iter()
            .map(|source| {
                let document_id = source.document_id();
                match self.recover_source(source) {
                    Ok(structure) => {
                        log::info!(
                            "{}: {} paragraphs, {} headers, {}/{} captioned images",
                            document_id,
                            structure.paragraphs.len(),
                            structure.headers.len(),
                            structure.captioned_count(),
                            structure.captions.len()
                        );
                        BatchOutcome::Recovered {
                            document_id,
                            structure: Box::new(structure),
                        }
                    },
                    Err(e) => {
                        log::warn!("Skipping {}: {}", document_id, e);
                        BatchOutcome::Skipped {
                            document_id,
                            reason: e.to_string(),
                        }
                    },
                }
            })
            .collect()
    }
}

impl Default for StructureRecovery {
    fn default() -> Self {
        Self::new(StructureConfig::default())
    }
}
