//! Hierarchical section numbers (`2`, `2.1`, `3.4.1.2`).
//!
//! A section number has four levels `A.B.C.D`; trailing zero levels are not
//! printed, so `2` and `2.0.0.0` are the same number. Ordering is
//! lexicographic over the four levels.

use crate::config::MAX_SECTION_DEPTH;
use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    /// Digits separated by dots, with one optional trailing dot ("2.1.").
    static ref RE_SECTION_NUMBER: Regex = Regex::new(r"^\d+(\.\d+)*\.?$").unwrap();
}

/// Check whether a token looks like a section number.
///
/// This is a shape check only; [`SectionNumber::parse`] additionally rejects
/// tokens with more levels than can be represented.
///
/// # Examples
///
/// ```
/// use section_oxide::structure::is_hsn;
///
/// assert!(is_hsn("2"));
/// assert!(is_hsn("2.1."));
/// assert!(!is_hsn("2.a"));
/// assert!(!is_hsn("Introduction"));
/// ```
pub fn is_hsn(token: &str) -> bool {
    RE_SECTION_NUMBER.is_match(token)
}

/// A hierarchical section number with up to four levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SectionNumber([u32; MAX_SECTION_DEPTH]);

impl SectionNumber {
    /// The synthetic root `0`, predecessor of every top-level section.
    pub const ROOT: SectionNumber = SectionNumber([0; MAX_SECTION_DEPTH]);

    /// Build a section number from explicit levels.
    pub fn new(levels: [u32; MAX_SECTION_DEPTH]) -> Self {
        Self(levels)
    }

    /// Parse a token such as `"3.2."`.
    ///
    /// Empty segments (the tolerated trailing dot) are dropped and missing
    /// levels are filled with zero. Tokens with more than four levels, or a
    /// level too large for `u32`, are rejected rather than truncated.
    ///
    /// # Examples
    ///
    /// ```
    /// use section_oxide::structure::SectionNumber;
    ///
    /// let n = SectionNumber::parse("3.2.").unwrap();
    /// assert_eq!(n.levels(), [3, 2, 0, 0]);
    /// assert!(SectionNumber::parse("1.2.3.4.5").is_err());
    /// ```
    pub fn parse(token: &str) -> Result<Self> {
        if !is_hsn(token) {
            return Err(Error::InvalidSectionNumber(token.to_string()));
        }

        let segments: Vec<&str> = token.split('.').filter(|s| !s.is_empty()).collect();
        let overflow = || Error::SectionNumberOverflow {
            token: token.to_string(),
            max_levels: MAX_SECTION_DEPTH,
        };

        if segments.len() > MAX_SECTION_DEPTH {
            return Err(overflow());
        }

        let mut levels = [0u32; MAX_SECTION_DEPTH];
        for (slot, segment) in levels.iter_mut().zip(&segments) {
            *slot = segment.parse().map_err(|_| overflow())?;
        }

        Ok(Self(levels))
    }

    /// The four levels `[A, B, C, D]`.
    pub fn levels(&self) -> [u32; MAX_SECTION_DEPTH] {
        self.0
    }

    /// Number of printed levels (trailing zeros elided, at least one).
    pub fn depth(&self) -> usize {
        self.0.iter().rposition(|&l| l != 0).map_or(1, |i| i + 1)
    }

    /// Whether `self` sorts strictly after `other`.
    ///
    /// A coarse filter: a number can only appear after `other` in a valid
    /// chain if it precedes it in this sense.
    pub fn precedes(&self, other: &SectionNumber) -> bool {
        self > other
    }

    /// Whether `self` is the next number after `other` at a single level.
    ///
    /// At the first level where the two differ, `self` must be exactly one
    /// more than `other`. Shallower levels are equal by construction; deeper
    /// levels of `other` are ignored, so `2.1` follows `2.0.7` and `3` follows
    /// `2.4.1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use section_oxide::structure::SectionNumber;
    ///
    /// let n = |s: &str| SectionNumber::parse(s).unwrap();
    /// assert!(n("1.1").is_immediate_successor(&n("1")));
    /// assert!(n("2").is_immediate_successor(&n("1.3")));
    /// assert!(!n("1.3").is_immediate_successor(&n("1.1")));
    /// assert!(!n("2").is_immediate_successor(&n("2")));
    /// ```
    pub fn is_immediate_successor(&self, other: &SectionNumber) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .find(|(mine, theirs)| mine != theirs)
            .is_some_and(|(&mine, &theirs)| theirs.checked_add(1) == Some(mine))
    }
}

impl FromStr for SectionNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SectionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let printed = &self.0[..self.depth()];
        let parts: Vec<String> = printed.iter().map(|l| l.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl Serialize for SectionNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
