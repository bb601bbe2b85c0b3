//! Community report data model.
//!
//! A report flags one address as fraudulent. Its descriptive payload, timestamps
//! and reporter are fixed at creation; the vote list is append-only until the
//! deadline; the stake fields change exactly once, at settlement.

use crate::{Chain, ChainAddress, PrincipalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identifier assigned to a report by the report store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(u64);

impl ReportId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "report-{}", self.0)
    }
}

/// A voter's answer to "is this address fraudulent?".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    /// The address is fraudulent (a "yes" vote on the report).
    Unsafe,
    /// The address is not fraudulent (a "no" vote on the report).
    Safe,
}

/// A recorded vote. Never modified after it is appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: PrincipalId,
    pub choice: VoteChoice,
    /// Stake backing this vote (raw units), fixed at cast time.
    pub weight: u128,
    pub cast_at: Timestamp,
}

/// Descriptive payload supplied by the reporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub chain: Chain,
    pub address: ChainAddress,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub evidence_refs: Vec<String>,
    #[serde(default)]
    pub reference_url: Option<String>,
}

/// Funds returned to one principal when they settled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub principal: PrincipalId,
    pub stake_returned: u128,
    pub reward_paid: u128,
    pub settled_at: Timestamp,
}

/// A community report against one address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub reporter: PrincipalId,
    pub payload: ReportPayload,
    pub created_at: Timestamp,
    pub vote_deadline: Timestamp,
    /// Reporter stake still held; zero once the reporter has settled.
    pub stake_amount: u128,
    /// Votes in arrival order, at most one per voter.
    pub votes: Vec<Vote>,
    /// Reporter reward, zero until the reporter settles.
    pub reward: u128,
    /// When the reporter settled.
    pub settled_at: Option<Timestamp>,
    /// Every settlement made on this report, reporter included.
    #[serde(default)]
    pub settlements: Vec<Settlement>,
}

impl Report {
    /// Build a freshly created report whose voting window starts at `created_at`.
    pub fn new(
        id: ReportId,
        reporter: PrincipalId,
        payload: ReportPayload,
        stake_amount: u128,
        created_at: Timestamp,
        vote_window: Duration,
    ) -> Self {
        Self {
            id,
            reporter,
            payload,
            created_at,
            vote_deadline: created_at.saturating_add(vote_window),
            stake_amount,
            votes: Vec::new(),
            reward: 0,
            settled_at: None,
            settlements: Vec::new(),
        }
    }

    pub fn address(&self) -> &ChainAddress {
        &self.payload.address
    }

    /// Votes are accepted strictly before the deadline.
    pub fn is_voting_open(&self, now: Timestamp) -> bool {
        !self.vote_deadline.has_passed(now)
    }

    pub fn vote_of(&self, voter: &PrincipalId) -> Option<&Vote> {
        self.votes.iter().find(|v| &v.voter == voter)
    }

    pub fn is_participant(&self, principal: &PrincipalId) -> bool {
        &self.reporter == principal || self.vote_of(principal).is_some()
    }

    pub fn settlement_of(&self, principal: &PrincipalId) -> Option<&Settlement> {
        self.settlements.iter().find(|s| &s.principal == principal)
    }

    /// Whether the reporter has released their stake.
    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(name: &str) -> PrincipalId {
        PrincipalId::new(name).unwrap()
    }

    fn report() -> Report {
        let payload = ReportPayload {
            chain: Chain::Ethereum,
            address: ChainAddress::new("0x6B175474E89094C44Da98b954EedeAC495271d0F").unwrap(),
            category: "phishing".into(),
            description: "drainer contract".into(),
            evidence_refs: vec![],
            reference_url: None,
        };
        Report::new(
            ReportId::new(1),
            principal("reporter"),
            payload,
            500,
            Timestamp::from_secs(10),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn deadline_follows_window() {
        let r = report();
        assert_eq!(r.vote_deadline, Timestamp::from_secs(70));
        assert!(r.is_voting_open(Timestamp::from_secs(69)));
        assert!(!r.is_voting_open(Timestamp::from_secs(70)));
    }

    #[test]
    fn participants_are_reporter_and_voters() {
        let mut r = report();
        r.votes.push(Vote {
            voter: principal("v1"),
            choice: VoteChoice::Unsafe,
            weight: 10,
            cast_at: Timestamp::from_secs(11),
        });
        assert!(r.is_participant(&principal("reporter")));
        assert!(r.is_participant(&principal("v1")));
        assert!(!r.is_participant(&principal("stranger")));
    }

    #[test]
    fn report_serializes_to_json() {
        let r = report();
        let json = serde_json::to_string(&r).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
