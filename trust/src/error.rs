use fradium_store::StoreError;
use fradium_types::ChainAddress;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrustError {
    #[error("no community report and no classifier result for {0}")]
    NoSignalAvailable(ChainAddress),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
