//! Report lifecycle: connects payload validation, voting, resolution and
//! settlement into one state machine.
//!
//! `Created → Voting → Finalized(Safe | Unsafe | Unresolved) → Settled`
//!
//! Only `Voting` and `Settled` depend on stored data (the deadline and the
//! reporter's settlement). `Finalized` is recomputed from the votes on every
//! read and never stored.

use crate::error::CommunityError;
use crate::resolver::{ConsensusResolver, Resolution, Verdict};
use crate::settlement::{compute_payout, record_settlement, Payout, RewardSchedule};
use crate::tally::{add_vote, check_vote, VoteTally};
use fradium_types::{
    Chain, EngineParams, PrincipalId, Report, ReportId, ReportPayload, Timestamp, VoteChoice,
};
use serde::{Deserialize, Serialize};

/// The externally visible state of a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    /// Accepting votes.
    Voting,
    /// Voting closed; stakes not yet released by the reporter.
    Finalized(Verdict),
    /// The reporter has settled.
    Settled(Verdict),
}

impl ReportStatus {
    pub fn verdict(&self) -> Verdict {
        match self {
            ReportStatus::Voting => Verdict::Pending,
            ReportStatus::Finalized(v) | ReportStatus::Settled(v) => *v,
        }
    }
}

/// Applies the engine parameters to a report's whole life.
#[derive(Clone, Debug)]
pub struct ReportLifecycle {
    params: EngineParams,
    resolver: ConsensusResolver,
    rewards: RewardSchedule,
}

impl ReportLifecycle {
    pub fn new(params: EngineParams) -> Self {
        let resolver = ConsensusResolver::from_params(&params);
        let rewards = RewardSchedule::from_params(&params);
        Self {
            params,
            resolver,
            rewards,
        }
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Validate a new report's payload and stake, normalizing the chain.
    ///
    /// An `Unknown` chain is replaced by the chain detected from the address.
    pub fn validate_new(
        &self,
        mut payload: ReportPayload,
        stake_amount: u128,
    ) -> Result<ReportPayload, CommunityError> {
        let needed = u128::from(self.params.min_report_stake);
        if stake_amount < needed {
            return Err(CommunityError::InsufficientStake {
                needed,
                provided: stake_amount,
            });
        }

        let description_len = payload.description.trim().chars().count();
        if description_len < self.params.min_description_len {
            return Err(CommunityError::InvalidPayload(format!(
                "description has {description_len} characters, minimum is {}",
                self.params.min_description_len
            )));
        }
        if description_len > self.params.max_description_len {
            return Err(CommunityError::InvalidPayload(format!(
                "description has {description_len} characters, maximum is {}",
                self.params.max_description_len
            )));
        }
        if payload.evidence_refs.len() > self.params.max_evidence_refs {
            return Err(CommunityError::InvalidPayload(format!(
                "{} evidence references, maximum is {}",
                payload.evidence_refs.len(),
                self.params.max_evidence_refs
            )));
        }
        if payload.category.trim().is_empty() {
            return Err(CommunityError::InvalidPayload("category is empty".into()));
        }

        if payload.chain == Chain::Unknown {
            payload.chain = payload.address.detect_chain();
        }
        Ok(payload)
    }

    /// Build the report for a validated payload. The caller has already
    /// reserved the stake.
    pub fn open(
        &self,
        id: ReportId,
        reporter: PrincipalId,
        payload: ReportPayload,
        stake_amount: u128,
        now: Timestamp,
    ) -> Report {
        Report::new(
            id,
            reporter,
            payload,
            stake_amount,
            now,
            self.params.vote_window(),
        )
    }

    pub fn check_vote(
        &self,
        report: &Report,
        voter: &PrincipalId,
        weight: u128,
        now: Timestamp,
    ) -> Result<(), CommunityError> {
        check_vote(report, voter, weight, now)
    }

    pub fn cast_vote(
        &self,
        report: &mut Report,
        voter: PrincipalId,
        choice: VoteChoice,
        weight: u128,
        now: Timestamp,
    ) -> Result<VoteTally, CommunityError> {
        let tally = add_vote(report, voter, choice, weight, now)?;
        tracing::debug!(
            report = %report.id,
            yes_weight = %tally.yes_weight,
            no_weight = %tally.no_weight,
            voters = tally.total_voters(),
            "vote recorded"
        );
        Ok(tally)
    }

    pub fn resolve(&self, report: &Report, now: Timestamp) -> Resolution {
        self.resolver.resolve(report, now)
    }

    pub fn status(&self, report: &Report, now: Timestamp) -> ReportStatus {
        let verdict = self.resolve(report, now).verdict;
        if !verdict.is_final() {
            ReportStatus::Voting
        } else if report.is_settled() {
            ReportStatus::Settled(verdict)
        } else {
            ReportStatus::Finalized(verdict)
        }
    }

    /// The payout `principal` would receive by settling now.
    pub fn payout(
        &self,
        report: &Report,
        principal: &PrincipalId,
        now: Timestamp,
    ) -> Result<Payout, CommunityError> {
        let resolution = self.resolve(report, now);
        compute_payout(report, &resolution, principal, &self.rewards)
    }

    /// Record a payout whose ledger transfers have completed.
    pub fn settle(&self, report: &mut Report, payout: &Payout, now: Timestamp) {
        record_settlement(report, payout, now);
    }
}
