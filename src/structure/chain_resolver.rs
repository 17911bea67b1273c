//! Resolution of a consistent section numbering chain.
//!
//! Header candidates contain noise: numbered list items set in bold, figure
//! labels, duplicated running heads. The resolver keeps the longest
//! subsequence of candidates (in document order) in which every number is the
//! immediate successor of the one before it.
//!
//! Resolution runs in two steps:
//!
//! 1. **Prefilter**: a candidate survives only if it is the immediate
//!    successor of some earlier survivor (or of the synthetic root `0`). This
//!    drops numbers that can never join a chain, such as a stray `9.5` between
//!    `2` and `2.1`.
//! 2. **Search**: a memoized backtracking search over the survivors. For the
//!    head candidate it tries every later immediate successor as the next
//!    element, the head alone, and skipping the head entirely, and keeps the
//!    longest result. Ties go to the option found first.
//!
//! The memo table lives for one [`ChainResolver::resolve`] call only.

use crate::error::{Error, Result};
use crate::structure::header_finder::HeaderCandidate;
use crate::structure::section_number::SectionNumber;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Drop candidates that are not the immediate successor of any earlier survivor.
///
/// The check runs against every survivor so far, not only the last one.
///
/// # Examples
///
/// ```
/// use section_oxide::structure::{prefilter_candidates, SectionNumber};
///
/// let numbers: Vec<SectionNumber> = ["1", "2", "9.5", "2.1"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// let kept = prefilter_candidates(&numbers, |n| *n);
/// assert_eq!(kept, vec![0, 1, 3]);
/// ```
pub fn prefilter_candidates<T, F>(items: &[T], hsn_of: F) -> Vec<usize>
where
    F: Fn(&T) -> SectionNumber,
{
    let mut valid = vec![SectionNumber::ROOT];
    let mut kept = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let hsn = hsn_of(item);
        if valid.iter().any(|v| hsn.is_immediate_successor(v)) {
            valid.push(hsn);
            kept.push(index);
        }
    }

    kept
}

/// Chain of successive candidates, built greedily from the first prefilter
/// survivor.
///
/// Used when the full search runs out of budget. The result is still a valid
/// chain, only possibly shorter than the optimum.
pub fn greedy_chain(candidates: &[HeaderCandidate]) -> Vec<HeaderCandidate> {
    let mut chain: Vec<HeaderCandidate> = Vec::new();
    for index in prefilter_candidates(candidates, |c| c.hsn) {
        let candidate = &candidates[index];
        let extends = chain
            .last()
            .map_or(true, |last| candidate.hsn.is_immediate_successor(&last.hsn));
        if extends {
            chain.push(candidate.clone());
        }
    }
    chain
}

/// Longest-chain resolver for section numbers.
#[derive(Debug, Clone, Default)]
pub struct ChainResolver {
    budget: Option<Duration>,
}

impl ChainResolver {
    /// Create a resolver without a time budget.
    pub fn new() -> Self {
        Self { budget: None }
    }

    /// Create a resolver that gives up after `budget` of wall-clock time.
    pub fn with_budget(budget: Option<Duration>) -> Self {
        Self { budget }
    }

    /// Resolve the longest valid chain among `candidates` (in document order).
    ///
    /// An empty result is not an error: the document simply has no resolvable
    /// numbering.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResolutionBudgetExceeded`] if the search runs past the
    /// configured budget.
    pub fn resolve(&self, candidates: &[HeaderCandidate]) -> Result<Vec<HeaderCandidate>> {
        let survivors: Vec<&HeaderCandidate> = prefilter_candidates(candidates, |c| c.hsn)
            .into_iter()
            .map(|i| &candidates[i])
            .collect();

        log::debug!(
            "Chain prefilter kept {} of {} candidates",
            survivors.len(),
            candidates.len()
        );

        if survivors.is_empty() {
            return Ok(Vec::new());
        }

        let mut search = ChainSearch::new(survivors.iter().map(|c| c.hsn).collect(), self.budget);
        let all: Vec<usize> = (0..survivors.len()).collect();
        let chain = search.longest(&all)?;

        log::debug!(
            "Chain search finished: length {} ({} memo entries)",
            chain.len(),
            search.memo.len()
        );

        Ok(chain.into_iter().map(|i| survivors[i].clone()).collect())
    }
}

/// State of one longest-chain search.
///
/// Candidates are referred to by their index among the prefilter survivors,
/// so two sub-lists holding the same candidates share a memo entry whichever
/// branch produced them.
struct ChainSearch {
    hsns: Vec<SectionNumber>,
    memo: HashMap<Vec<usize>, Vec<usize>>,
    budget: Option<Duration>,
    started: Instant,
}

impl ChainSearch {
    fn new(hsns: Vec<SectionNumber>, budget: Option<Duration>) -> Self {
        Self {
            hsns,
            memo: HashMap::new(),
            budget,
            started: Instant::now(),
        }
    }

    fn check_budget(&self) -> Result<()> {
        match self.budget {
            Some(budget) if self.started.elapsed() > budget => Err(Error::ResolutionBudgetExceeded {
                elapsed_ms: self.started.elapsed().as_millis(),
            }),
            _ => Ok(()),
        }
    }

    /// Longest chain within `list`, which is in document order.
    fn longest(&mut self, list: &[usize]) -> Result<Vec<usize>> {
        let Some((&head, rest)) = list.split_first() else {
            return Ok(Vec::new());
        };
        if let Some(hit) = self.memo.get(list) {
            return Ok(hit.clone());
        }
        self.check_budget()?;

        let head_hsn = self.hsns[head];

        // One branch per immediate successor of the head, skipping branches
        // whose members are already covered by an earlier branch.
        let mut branches: Vec<Vec<usize>> = Vec::new();
        let mut branch_sets: Vec<HashSet<usize>> = Vec::new();
        for (pos, &next) in rest.iter().enumerate() {
            if !self.hsns[next].is_immediate_successor(&head_hsn) {
                continue;
            }
            let branch = self.branch_from(&rest[pos..], &head_hsn);
            let members: HashSet<usize> = branch.iter().copied().collect();
            if branch_sets.iter().any(|seen| members.is_subset(seen)) {
                continue;
            }
            branch_sets.push(members);
            branches.push(branch);
        }

        let mut chains: Vec<Vec<usize>> = Vec::with_capacity(branches.len() + 2);
        for branch in &branches {
            let tail = self.longest(branch)?;
            let links = tail
                .first()
                .map_or(true, |&t| self.hsns[t].is_immediate_successor(&head_hsn));
            if links {
                let mut chain = Vec::with_capacity(tail.len() + 1);
                chain.push(head);
                chain.extend(tail);
                chains.push(chain);
            }
        }
        chains.push(vec![head]);

        let subsumed = chains.iter().any(|chain| rest.iter().all(|r| chain.contains(r)));
        if !subsumed {
            chains.push(self.longest(rest)?);
        }

        let mut best: Vec<usize> = Vec::new();
        for chain in chains {
            if chain.len() > best.len() {
                best = chain;
            }
        }

        self.memo.insert(list.to_vec(), best.clone());
        Ok(best)
    }

    /// Candidates from `from` (which starts at the chosen successor) that could
    /// still belong under `head`, kept only while they attach to the tree grown
    /// so far.
    fn branch_from(&self, from: &[usize], head: &SectionNumber) -> Vec<usize> {
        let mut kept: Vec<usize> = Vec::new();
        for &index in from {
            let hsn = self.hsns[index];
            if !hsn.precedes(head) {
                continue;
            }
            if kept.is_empty() || kept.iter().any(|&k| hsn.is_immediate_successor(&self.hsns[k])) {
                kept.push(index);
            }
        }
        kept
    }
}
