//! Read models returned by the engine's query operations.

use fradium_community::{Payout, ReportStatus, Verdict, VoteTally};
use fradium_types::{ChainAddress, Report, ReportId, Settlement, Timestamp, VoteChoice};
use serde::{Deserialize, Serialize};

/// A report together with everything derived from its votes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportView {
    pub report: Report,
    pub tally: VoteTally,
    pub verdict: Verdict,
    pub status: ReportStatus,
}

/// A report as seen by its reporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyReport {
    pub view: ReportView,
    /// What settling now would pay; `None` while voting or once settled.
    pub claimable: Option<Payout>,
    pub settlement: Option<Settlement>,
}

/// One vote as seen by the voter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyVote {
    pub report_id: ReportId,
    pub address: ChainAddress,
    pub choice: VoteChoice,
    pub weight: u128,
    pub cast_at: Timestamp,
    pub verdict: Verdict,
    /// Known once the verdict is decisive.
    pub voted_correctly: Option<bool>,
    pub claimable: Option<Payout>,
    pub settlement: Option<Settlement>,
}
