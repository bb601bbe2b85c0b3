//! Settlement: returns stakes and pays rewards once a report is finalized.
//!
//! After the voting window closes, each participant settles independently:
//! - The reporter gets their stake back, plus a reward if the verdict is Unsafe.
//! - A voter gets their vote weight back, plus a reward if the verdict is Unsafe
//!   and they voted Unsafe.
//! - Safe and Unresolved verdicts return stakes with no reward.

use crate::error::CommunityError;
use crate::resolver::Resolution;
use fradium_types::{bps_of, EngineParams, PrincipalId, Report, Settlement, Timestamp};
use serde::{Deserialize, Serialize};

/// Reward ratios applied at settlement, in basis points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// Share of the reporter's stake paid as reward.
    pub reporter_reward_bps: u32,
    /// Share of a correct voter's weight paid as reward.
    pub voter_reward_bps: u32,
}

impl RewardSchedule {
    pub fn from_params(params: &EngineParams) -> Self {
        Self {
            reporter_reward_bps: params.reporter_reward_bps,
            voter_reward_bps: params.voter_reward_bps,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantRole {
    Reporter,
    Voter,
}

/// What one participant receives when settling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub principal: PrincipalId,
    pub role: ParticipantRole,
    pub stake_returned: u128,
    pub reward_paid: u128,
    /// Voter correctness; `None` for the reporter or a non-decisive verdict.
    pub voted_correctly: Option<bool>,
}

/// Compute the payout owed to `principal` on `report`.
///
/// Fails if the report is still open, the principal already settled, or the
/// principal took no part in the report.
pub fn compute_payout(
    report: &Report,
    resolution: &Resolution,
    principal: &PrincipalId,
    schedule: &RewardSchedule,
) -> Result<Payout, CommunityError> {
    if !resolution.verdict.is_final() {
        return Err(CommunityError::NotFinalized(report.id));
    }
    if report.settlement_of(principal).is_some() {
        return Err(CommunityError::AlreadySettled(principal.clone()));
    }

    let unsafe_verdict = resolution.verdict.is_unsafe();

    if &report.reporter == principal {
        let reward_paid = if unsafe_verdict {
            bps_of(report.stake_amount, schedule.reporter_reward_bps)
        } else {
            0
        };
        return Ok(Payout {
            principal: principal.clone(),
            role: ParticipantRole::Reporter,
            stake_returned: report.stake_amount,
            reward_paid,
            voted_correctly: None,
        });
    }

    let vote = report
        .vote_of(principal)
        .ok_or_else(|| CommunityError::NotParticipant(principal.clone()))?;
    let voted_correctly = resolution.is_correct(vote);
    let reward_paid = if unsafe_verdict && voted_correctly == Some(true) {
        bps_of(vote.weight, schedule.voter_reward_bps)
    } else {
        0
    };

    Ok(Payout {
        principal: principal.clone(),
        role: ParticipantRole::Voter,
        stake_returned: vote.weight,
        reward_paid,
        voted_correctly,
    })
}

/// Record a completed payout on the report.
///
/// Call only after the ledger transfers have succeeded.
pub fn record_settlement(report: &mut Report, payout: &Payout, now: Timestamp) {
    if payout.role == ParticipantRole::Reporter {
        report.stake_amount = 0;
        report.reward = payout.reward_paid;
        report.settled_at = Some(now);
    }
    report.settlements.push(Settlement {
        principal: payout.principal.clone(),
        stake_returned: payout.stake_returned,
        reward_paid: payout.reward_paid,
        settled_at: now,
    });
}
