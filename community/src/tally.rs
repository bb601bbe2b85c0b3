//! Vote tally: voters cast stake-weighted votes on a report.

use crate::error::CommunityError;
use fradium_types::{PrincipalId, Report, Timestamp, Vote, VoteChoice};
use serde::{Deserialize, Serialize};

/// Aggregate of the votes on a report.
///
/// "Yes" is a vote that the address is Unsafe, "no" that it is Safe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes_weight: u128,
    pub no_weight: u128,
    pub yes_count: u32,
    pub no_count: u32,
}

impl VoteTally {
    pub fn from_votes(votes: &[Vote]) -> Self {
        votes.iter().fold(Self::default(), |mut tally, v| {
            tally.record(v.choice, v.weight);
            tally
        })
    }

    pub fn record(&mut self, choice: VoteChoice, weight: u128) {
        match choice {
            VoteChoice::Unsafe => {
                self.yes_weight = self.yes_weight.saturating_add(weight);
                self.yes_count += 1;
            }
            VoteChoice::Safe => {
                self.no_weight = self.no_weight.saturating_add(weight);
                self.no_count += 1;
            }
        }
    }

    pub fn total_voters(&self) -> u32 {
        self.yes_count + self.no_count
    }

    pub fn total_weight(&self) -> u128 {
        self.yes_weight.saturating_add(self.no_weight)
    }

    /// Strict weighted majority for Unsafe. Ties are not a majority.
    pub fn unsafe_majority(&self) -> bool {
        self.yes_weight > self.no_weight
    }
}

/// Check whether `voter` may cast a vote of `weight` on `report` at `now`.
///
/// Checks run in a fixed order: self-vote, duplicate voter, closed window,
/// then weight, so the same bad request always yields the same error.
pub fn check_vote(
    report: &Report,
    voter: &PrincipalId,
    weight: u128,
    now: Timestamp,
) -> Result<(), CommunityError> {
    if &report.reporter == voter {
        return Err(CommunityError::SelfVote(voter.clone()));
    }
    if report.vote_of(voter).is_some() {
        return Err(CommunityError::DuplicateVoter(voter.clone()));
    }
    if !report.is_voting_open(now) {
        return Err(CommunityError::VotingClosed(report.id));
    }
    if weight == 0 {
        return Err(CommunityError::InvalidWeight);
    }
    Ok(())
}

/// Validate and append a vote, returning the updated tally.
pub fn add_vote(
    report: &mut Report,
    voter: PrincipalId,
    choice: VoteChoice,
    weight: u128,
    now: Timestamp,
) -> Result<VoteTally, CommunityError> {
    check_vote(report, &voter, weight, now)?;
    report.votes.push(Vote {
        voter,
        choice,
        weight,
        cast_at: now,
    });
    Ok(VoteTally::from_votes(&report.votes))
}
