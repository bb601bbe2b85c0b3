use fradium_community::CommunityError;
use fradium_store::{LedgerError, StoreError};
use fradium_trust::TrustError;
use fradium_types::{ChainAddress, PrincipalId, ReportId, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Community(#[from] CommunityError),

    #[error(transparent)]
    Trust(#[from] TrustError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("invalid input: {0}")]
    Types(#[from] TypesError),

    #[error("{0} not found")]
    ReportNotFound(ReportId),

    #[error("address {address} already has {open} open for voting")]
    ReportAlreadyOpen { address: ChainAddress, open: ReportId },

    #[error("address {address} was already found unsafe by {report}")]
    AddressFlaggedUnsafe { address: ChainAddress, report: ReportId },

    #[error("ledger inconsistent for {principal} ({amount} raw): {detail}")]
    LedgerInconsistent {
        principal: PrincipalId,
        amount: u128,
        detail: String,
    },

    #[error("config error: {0}")]
    Config(String),
}

/// How a caller should react to an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input. Fix it and retry.
    Validation,
    /// The operation is out of sequence for the report's state.
    State,
    /// No signal either way; present as unknown risk.
    SoftFailure,
    /// A store or ledger misbehaved.
    Collaborator,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Community(e) => match e {
                CommunityError::DuplicateVoter(_)
                | CommunityError::SelfVote(_)
                | CommunityError::VotingClosed(_)
                | CommunityError::InvalidWeight
                | CommunityError::InsufficientStake { .. }
                | CommunityError::InvalidPayload(_) => ErrorKind::Validation,
                CommunityError::NotFinalized(_)
                | CommunityError::AlreadySettled(_)
                | CommunityError::NotParticipant(_) => ErrorKind::State,
            },
            EngineError::Trust(TrustError::NoSignalAvailable(_)) => ErrorKind::SoftFailure,
            EngineError::Trust(TrustError::Store(_)) => ErrorKind::Collaborator,
            EngineError::Ledger(LedgerError::InsufficientBalance { .. }) => ErrorKind::Validation,
            EngineError::Store(_) | EngineError::Ledger(_) => ErrorKind::Collaborator,
            EngineError::LedgerInconsistent { .. } => ErrorKind::Collaborator,
            EngineError::Types(_) | EngineError::Config(_) => ErrorKind::Validation,
            EngineError::ReportNotFound(_) => ErrorKind::Validation,
            EngineError::ReportAlreadyOpen { .. } | EngineError::AddressFlaggedUnsafe { .. } => {
                ErrorKind::State
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy() {
        let voter = PrincipalId::new("v").unwrap();
        let address = ChainAddress::new("bc1qexample").unwrap();

        let cases = [
            (EngineError::from(CommunityError::SelfVote(voter.clone())), ErrorKind::Validation),
            (EngineError::from(CommunityError::InvalidWeight), ErrorKind::Validation),
            (
                EngineError::from(CommunityError::VotingClosed(ReportId::new(1))),
                ErrorKind::Validation,
            ),
            (
                EngineError::from(CommunityError::NotFinalized(ReportId::new(1))),
                ErrorKind::State,
            ),
            (
                EngineError::from(CommunityError::AlreadySettled(voter.clone())),
                ErrorKind::State,
            ),
            (
                EngineError::from(TrustError::NoSignalAvailable(address)),
                ErrorKind::SoftFailure,
            ),
            (
                EngineError::from(LedgerError::Unavailable("down".into())),
                ErrorKind::Collaborator,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }
}
