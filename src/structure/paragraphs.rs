//! Paragraph assembly.
//!
//! Once headers, furniture and captions are known, every remaining fragment is
//! assigned to the nearest header before it. Fragments before the first
//! header (title page, author block) are dropped, as is everything up to the
//! abstract heading and from the references heading on.

use crate::layout::fragment::Fragment;
use crate::layout::page_furniture::PageFurniture;
use crate::structure::captions::Caption;
use crate::structure::header_finder::HeaderCandidate;
use crate::structure::section_number::SectionNumber;
use crate::text::{cleanup, keywords, sentences};
use serde::Serialize;
use std::collections::HashSet;

/// Fragment ids that never enter a paragraph body.
#[derive(Debug, Clone, Default)]
pub struct ExclusionMask {
    ids: HashSet<u64>,
    abstract_boundary_id: Option<u64>,
    references_boundary_id: Option<u64>,
}

impl ExclusionMask {
    /// Create a mask bounded by the abstract and references headings.
    ///
    /// Ids up to and including the abstract boundary, and ids from the
    /// references boundary on, are excluded.
    pub fn new(abstract_boundary_id: Option<u64>, references_boundary_id: Option<u64>) -> Self {
        Self {
            ids: HashSet::new(),
            abstract_boundary_id,
            references_boundary_id,
        }
    }

    /// Build the full mask from furniture, captions and accepted headers.
    pub fn from_parts(
        furniture: &PageFurniture,
        captions: &[Caption],
        headers: &[HeaderCandidate],
        abstract_boundary_id: Option<u64>,
        references_boundary_id: Option<u64>,
    ) -> Self {
        let mut mask = Self::new(abstract_boundary_id, references_boundary_id);
        mask.exclude(furniture.excluded_ids.iter().copied());
        for caption in captions {
            mask.exclude(caption.fragment_ids());
        }
        for header in headers {
            mask.exclude(header.line.fragment_ids());
        }
        mask
    }

    /// Add ids to the mask.
    pub fn exclude<I: IntoIterator<Item = u64>>(&mut self, ids: I) {
        self.ids.extend(ids);
    }

    /// Whether a fragment id is excluded.
    pub fn is_excluded(&self, id: u64) -> bool {
        self.ids.contains(&id)
            || self.abstract_boundary_id.is_some_and(|b| id <= b)
            || self.references_boundary_id.is_some_and(|b| id >= b)
    }
}

/// A section heading with the body text that follows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    /// Heading line text
    pub title: String,
    /// Section number of the heading
    pub section: SectionNumber,
    /// Id of the first fragment of the heading line
    pub header_id: u64,
    /// Body fragments in document order
    #[serde(skip)]
    pub body_fragments: Vec<Fragment>,
    /// Reconstructed body text
    pub text: String,
    /// Captioned images referenced from the body
    pub images: Vec<Caption>,
}

impl Paragraph {
    fn new(header: &HeaderCandidate) -> Self {
        Self {
            title: header.line.text(),
            section: header.hsn,
            header_id: header.start_id(),
            body_fragments: Vec::new(),
            text: String::new(),
            images: Vec::new(),
        }
    }

    /// Ids of the body fragments.
    pub fn fragment_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.body_fragments.iter().map(|f| f.id)
    }

    /// Body text split into sentences.
    pub fn sentences(&self) -> Vec<String> {
        sentences::split_sentences(&self.text)
    }

    /// Normalized keywords of title and body.
    pub fn keywords(&self) -> Vec<String> {
        keywords::normalize_keywords(&format!("{} {}", self.title, self.text))
    }
}

/// Partition unmasked fragments into one paragraph per header.
///
/// `headers` is the resolved chain. Each unmasked fragment goes to the last
/// header starting at or before it; images are attached to a paragraph when
/// its text references their figure number.
pub fn assemble_paragraphs(
    fragments: &[Fragment],
    headers: &[HeaderCandidate],
    mask: &ExclusionMask,
    captions: &[Caption],
) -> Vec<Paragraph> {
    let mut paragraphs: Vec<Paragraph> = headers.iter().map(Paragraph::new).collect();

    let mut starts: Vec<(u64, usize)> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| (header.start_id(), index))
        .collect();
    starts.sort_by_key(|&(start, _)| start);

    let mut dropped = 0usize;
    for fragment in fragments {
        if mask.is_excluded(fragment.id) {
            continue;
        }
        let owners = starts.partition_point(|&(start, _)| start <= fragment.id);
        match owners.checked_sub(1) {
            Some(pos) => paragraphs[starts[pos].1].body_fragments.push(fragment.clone()),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("Dropped {} preamble fragments before the first header", dropped);
    }

    for paragraph in &mut paragraphs {
        paragraph.text = cleanup::fragments_text(&paragraph.body_fragments);
        let referenced = cleanup::figure_references(&paragraph.text);
        paragraph.images = captions
            .iter()
            .filter(|c| c.figure_number.is_some_and(|n| referenced.contains(&n)))
            .cloned()
            .collect();
    }

    paragraphs
}
