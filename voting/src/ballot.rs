//! Per-decision ballot book: one immutable ballot per identity.

use crate::tally::Tally;
use crate::VotingError;
use athena_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cast vote. Never retracted, never replaced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub voter: Address,
    pub in_favor: bool,
    /// Weight contributed at cast time.
    pub weight: u128,
    pub cast_at: Timestamp,
}

/// Reason attached to a vote, kept as an append-only audit log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonEntry {
    pub voter: Address,
    pub reason_ref: String,
}

/// All ballots of one decision, in cast order, with their running tally.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BallotBook {
    ballots: BTreeMap<Address, Ballot>,
    order: Vec<Address>,
    reasons: Vec<ReasonEntry>,
    tally: Tally,
}

impl BallotBook {
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.ballots.contains_key(voter)
    }

    pub fn ballot(&self, voter: &Address) -> Option<&Ballot> {
        self.ballots.get(voter)
    }

    /// The voter's recorded choice, if any.
    pub fn choice(&self, voter: &Address) -> Option<bool> {
        self.ballots.get(voter).map(|b| b.in_favor)
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Ballots in the order they were cast.
    pub fn iter(&self) -> impl Iterator<Item = &Ballot> {
        self.order.iter().filter_map(|v| self.ballots.get(v))
    }

    pub fn reasons(&self) -> &[ReasonEntry] {
        &self.reasons
    }

    /// Record a ballot. The tally is computed before anything is written,
    /// so a failure leaves the book unchanged.
    pub fn record(
        &mut self,
        decision: &str,
        ballot: Ballot,
        reason_ref: &str,
    ) -> Result<(), VotingError> {
        if self.has_voted(&ballot.voter) {
            return Err(VotingError::AlreadyVoted {
                decision: decision.to_string(),
                voter: ballot.voter.to_string(),
            });
        }
        let tally = self
            .tally
            .with_vote(ballot.in_favor, ballot.weight)
            .ok_or(VotingError::Overflow)?;

        self.tally = tally;
        self.order.push(ballot.voter.clone());
        self.reasons.push(ReasonEntry {
            voter: ballot.voter.clone(),
            reason_ref: reason_ref.to_string(),
        });
        self.ballots.insert(ballot.voter.clone(), ballot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ballot(n: u8, in_favor: bool, weight: u128) -> Ballot {
        Ballot {
            voter: Address::new(format!("0x{:02x}", n)),
            in_favor,
            weight,
            cast_at: Timestamp::new(5),
        }
    }

    #[test]
    fn records_in_cast_order() {
        let mut book = BallotBook::default();
        book.record("d", ballot(2, true, 10), "r2").unwrap();
        book.record("d", ballot(1, false, 5), "r1").unwrap();
        let voters: Vec<_> = book.iter().map(|b| b.voter.to_string()).collect();
        assert_eq!(voters, vec!["0x02", "0x01"]);
        assert_eq!(book.reasons()[1].reason_ref, "r1");
        assert_eq!(book.tally().for_weight, 10);
        assert_eq!(book.tally().against_weight, 5);
    }

    #[test]
    fn second_vote_rejected_and_tally_unchanged() {
        let mut book = BallotBook::default();
        book.record("d", ballot(1, true, 10), "r").unwrap();
        let err = book.record("d", ballot(1, false, 99), "again").unwrap_err();
        assert!(matches!(err, VotingError::AlreadyVoted { .. }));
        assert_eq!(book.tally().against_weight, 0);
        assert_eq!(book.len(), 1);
        assert_eq!(book.choice(&Address::new("0x01")), Some(true));
    }

    #[test]
    fn overflow_leaves_book_unchanged() {
        let mut book = BallotBook::default();
        book.record("d", ballot(1, true, u128::MAX), "r").unwrap();
        assert!(book.record("d", ballot(2, true, 1), "r").is_err());
        assert_eq!(book.len(), 1);
        assert!(!book.has_voted(&Address::new("0x02")));
    }
}
