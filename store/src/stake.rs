//! Stake ledger contract.
//!
//! The ledger holds user token balances. The engine reserves stakes when a
//! report is opened or a vote is cast, and releases them (plus any reward) at
//! settlement. The ledger may be remote, so every call is a suspension point.

use crate::LedgerError;
use fradium_types::PrincipalId;
use std::future::Future;

pub trait StakeLedger: Send + Sync {
    /// Move `amount` from the principal's free balance into their reserved stake.
    fn reserve(
        &self,
        principal: &PrincipalId,
        amount: u128,
    ) -> impl Future<Output = Result<(), LedgerError>> + Send;

    /// Move `amount` of reserved stake back to the principal's free balance.
    fn release(
        &self,
        principal: &PrincipalId,
        amount: u128,
    ) -> impl Future<Output = Result<(), LedgerError>> + Send;

    /// Pay `amount` from the reward pool to the principal.
    fn reward(
        &self,
        principal: &PrincipalId,
        amount: u128,
    ) -> impl Future<Output = Result<(), LedgerError>> + Send;
}
