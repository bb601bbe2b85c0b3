//! Consensus resolver: turns a report's votes into a verdict.
//!
//! Resolution is a pure function of the vote list, the deadline and the
//! quorum. Nothing is cached: every read after the deadline recomputes the
//! same verdict from the same frozen votes.

use crate::tally::VoteTally;
use fradium_types::{EngineParams, Report, Timestamp, Vote, VoteChoice};
use serde::{Deserialize, Serialize};

/// The community verdict on a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The voting window is still open.
    Pending,
    /// Voting closed below quorum. Treated as safe downstream.
    Unresolved,
    /// Voting closed and the Unsafe weight did not exceed the Safe weight.
    Safe,
    /// Voting closed with a strict Unsafe weight majority.
    Unsafe,
}

impl Verdict {
    /// Whether the voting window has closed.
    pub fn is_final(&self) -> bool {
        !matches!(self, Verdict::Pending)
    }

    pub fn is_unsafe(&self) -> bool {
        matches!(self, Verdict::Unsafe)
    }

    /// Whether quorum was met, so per-voter correctness is defined.
    pub fn is_decisive(&self) -> bool {
        matches!(self, Verdict::Safe | Verdict::Unsafe)
    }
}

/// A verdict together with the tally it was computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub verdict: Verdict,
    pub tally: VoteTally,
}

impl Resolution {
    /// Whether `vote` sided with the weighted majority.
    ///
    /// `None` until the verdict is decisive.
    pub fn is_correct(&self, vote: &Vote) -> Option<bool> {
        if !self.verdict.is_decisive() {
            return None;
        }
        Some(self.tally.unsafe_majority() == (vote.choice == VoteChoice::Unsafe))
    }
}

/// Applies the quorum and weighted-majority rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsensusResolver {
    minimum_quorum: u32,
}

impl ConsensusResolver {
    pub fn new(minimum_quorum: u32) -> Self {
        Self { minimum_quorum }
    }

    pub fn from_params(params: &EngineParams) -> Self {
        Self::new(params.minimum_quorum)
    }

    /// Resolve `report` as of `now`.
    pub fn resolve(&self, report: &Report, now: Timestamp) -> Resolution {
        let tally = VoteTally::from_votes(&report.votes);

        let verdict = if report.is_voting_open(now) {
            Verdict::Pending
        } else if (report.votes.len() as u64) < self.minimum_quorum as u64 {
            Verdict::Unresolved
        } else if tally.unsafe_majority() {
            Verdict::Unsafe
        } else {
            Verdict::Safe
        };

        Resolution { verdict, tally }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fradium_types::{Chain, ChainAddress, PrincipalId, ReportId, ReportPayload};
    use std::time::Duration;

    fn principal(name: &str) -> PrincipalId {
        PrincipalId::new(name).unwrap()
    }

    fn report_with(votes: &[(&str, VoteChoice, u128)]) -> Report {
        let payload = ReportPayload {
            chain: Chain::Ethereum,
            address: ChainAddress::new("0x00000000219ab540356cBB839Cbe05303d7705Fa").unwrap(),
            category: "scam".into(),
            description: "fake airdrop".into(),
            evidence_refs: vec![],
            reference_url: None,
        };
        let mut report = Report::new(
            ReportId::new(1),
            principal("reporter"),
            payload,
            100,
            Timestamp::from_secs(0),
            Duration::from_secs(10),
        );
        for (name, choice, weight) in votes {
            report.votes.push(Vote {
                voter: principal(name),
                choice: *choice,
                weight: *weight,
                cast_at: Timestamp::from_secs(1),
            });
        }
        report
    }

    const BEFORE_DEADLINE: Timestamp = Timestamp::EPOCH;

    fn after_deadline() -> Timestamp {
        Timestamp::from_secs(10)
    }

    #[test]
    fn pending_before_deadline() {
        let report = report_with(&[("v1", VoteChoice::Unsafe, 50)]);
        let res = ConsensusResolver::new(1).resolve(&report, BEFORE_DEADLINE);
        assert_eq!(res.verdict, Verdict::Pending);
        assert_eq!(res.tally.yes_weight, 50);
    }

    #[test]
    fn weighted_majority_unsafe() {
        let report = report_with(&[
            ("v1", VoteChoice::Unsafe, 30),
            ("v2", VoteChoice::Safe, 10),
        ]);
        let res = ConsensusResolver::new(1).resolve(&report, after_deadline());
        assert_eq!(res.verdict, Verdict::Unsafe);
        assert_eq!(res.is_correct(&report.votes[0]), Some(true));
        assert_eq!(res.is_correct(&report.votes[1]), Some(false));
    }

    #[test]
    fn weight_beats_head_count() {
        let report = report_with(&[
            ("v1", VoteChoice::Unsafe, 5),
            ("v2", VoteChoice::Unsafe, 5),
            ("v3", VoteChoice::Safe, 11),
        ]);
        let res = ConsensusResolver::new(1).resolve(&report, after_deadline());
        assert_eq!(res.verdict, Verdict::Safe);
        assert_eq!(res.is_correct(&report.votes[2]), Some(true));
    }

    #[test]
    fn tie_favours_the_address() {
        let report = report_with(&[
            ("v1", VoteChoice::Unsafe, 20),
            ("v2", VoteChoice::Safe, 20),
        ]);
        let res = ConsensusResolver::new(2).resolve(&report, after_deadline());
        assert_eq!(res.verdict, Verdict::Safe);
        assert_eq!(res.is_correct(&report.votes[0]), Some(false));
        assert_eq!(res.is_correct(&report.votes[1]), Some(true));
    }

    #[test]
    fn below_quorum_is_unresolved() {
        let report = report_with(&[("whale", VoteChoice::Unsafe, 1_000_000)]);
        let res = ConsensusResolver::new(3).resolve(&report, after_deadline());
        assert_eq!(res.verdict, Verdict::Unresolved);
        assert_eq!(res.is_correct(&report.votes[0]), None);
    }

    #[test]
    fn no_votes_with_quorum_one_is_unresolved() {
        let report = report_with(&[]);
        let res = ConsensusResolver::new(1).resolve(&report, after_deadline());
        assert_eq!(res.verdict, Verdict::Unresolved);
    }

    #[test]
    fn resolution_is_idempotent() {
        let report = report_with(&[
            ("v1", VoteChoice::Unsafe, 3),
            ("v2", VoteChoice::Safe, 2),
        ]);
        let before = report.clone();
        let resolver = ConsensusResolver::new(1);
        let first = resolver.resolve(&report, after_deadline());
        let second = resolver.resolve(&report, Timestamp::from_secs(10_000));
        assert_eq!(first, second);
        assert_eq!(report, before);
    }
}
