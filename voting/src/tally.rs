//! Weighted tallies and the rules that turn them into verdicts.
//!
//! Skill applications and questions finalize themselves as soon as
//! [`QuorumMajority`] is satisfied. A dispute tally never finalizes on its
//! own ([`ExplicitResolution`]); a separately authorized resolution call does.

use athena_types::quorum::finalization_quorum;
use serde::{Deserialize, Serialize};

/// Running totals of one decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub for_weight: u128,
    pub against_weight: u128,
    pub for_count: u32,
    pub against_count: u32,
}

impl Tally {
    /// The tally after one more vote, or `None` on overflow.
    pub fn with_vote(&self, in_favor: bool, weight: u128) -> Option<Self> {
        let mut next = *self;
        if in_favor {
            next.for_weight = next.for_weight.checked_add(weight)?;
            next.for_count = next.for_count.checked_add(1)?;
        } else {
            next.against_weight = next.against_weight.checked_add(weight)?;
            next.against_count = next.against_count.checked_add(1)?;
        }
        Some(next)
    }

    /// Number of ballots cast.
    pub fn head_count(&self) -> u32 {
        self.for_count.saturating_add(self.against_count)
    }

    pub fn total_weight(&self) -> u128 {
        self.for_weight.saturating_add(self.against_weight)
    }
}

/// Outcome of evaluating a finalization rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Stay open.
    Pending,
    /// Finalize in favour (verified / answered).
    Approved,
    /// Finalize against.
    Rejected,
}

/// Decides whether a tally is final.
pub trait FinalizationRule {
    /// `member_count` is the assigned oracle's member count at evaluation time.
    fn evaluate(&self, tally: &Tally, member_count: u32) -> Verdict;
}

/// Final once more than half of the oracle's *current* members have voted
/// and the weighted result is not a tie; the heavier side wins.
///
/// The quorum denominator is read at every evaluation, so members joining
/// mid-vote raise the bar for decisions already open.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuorumMajority;

impl FinalizationRule for QuorumMajority {
    fn evaluate(&self, tally: &Tally, member_count: u32) -> Verdict {
        if tally.head_count() < finalization_quorum(member_count) {
            return Verdict::Pending;
        }
        match tally.for_weight.cmp(&tally.against_weight) {
            std::cmp::Ordering::Greater => Verdict::Approved,
            std::cmp::Ordering::Less => Verdict::Rejected,
            std::cmp::Ordering::Equal => Verdict::Pending,
        }
    }
}

/// Never final: resolution is an explicit, separately authorized step.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExplicitResolution;

impl FinalizationRule for ExplicitResolution {
    fn evaluate(&self, _tally: &Tally, _member_count: u32) -> Verdict {
        Verdict::Pending
    }
}
