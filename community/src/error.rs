use fradium_types::{PrincipalId, ReportId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommunityError {
    #[error("voter {0} has already voted on this report")]
    DuplicateVoter(PrincipalId),

    #[error("reporter {0} cannot vote on their own report")]
    SelfVote(PrincipalId),

    #[error("voting on {0} has closed")]
    VotingClosed(ReportId),

    #[error("vote weight must be positive")]
    InvalidWeight,

    #[error("{0} is still open for voting")]
    NotFinalized(ReportId),

    #[error("{0} has already settled on this report")]
    AlreadySettled(PrincipalId),

    #[error("{0} neither created nor voted on this report")]
    NotParticipant(PrincipalId),

    #[error("insufficient stake: needed {needed}, provided {provided}")]
    InsufficientStake { needed: u128, provided: u128 },

    #[error("invalid report payload: {0}")]
    InvalidPayload(String),
}
