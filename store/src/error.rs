use fradium_types::PrincipalId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Failures reported by the token ledger holding stakes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance for {principal}: need {needed}, have {available}")]
    InsufficientBalance {
        principal: PrincipalId,
        needed: u128,
        available: u128,
    },

    #[error("insufficient reserved stake for {principal}: need {needed}, have {reserved}")]
    InsufficientReserved {
        principal: PrincipalId,
        needed: u128,
        reserved: u128,
    },

    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("ledger rejected the transfer: {0}")]
    Rejected(String),
}
