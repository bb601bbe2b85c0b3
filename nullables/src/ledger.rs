//! Nullable stake ledger with free/reserved balances and failure injection.

use fradium_store::{LedgerError, StakeLedger};
use fradium_types::PrincipalId;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Which ledger operation an injected failure applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerOp {
    Reserve,
    Release,
    Reward,
}

#[derive(Clone, Copy, Debug, Default)]
struct Account {
    free: u128,
    reserved: u128,
    rewarded: u128,
}

/// An in-memory stake ledger.
///
/// Rewards are minted from an unbounded pool and credited to the free
/// balance. Failures are queued per operation and consumed one call at a time.
pub struct NullStakeLedger {
    accounts: Mutex<HashMap<PrincipalId, Account>>,
    failures: Mutex<VecDeque<(LedgerOp, LedgerError)>>,
    calls: Mutex<Vec<(LedgerOp, PrincipalId, u128)>>,
}

impl NullStakeLedger {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            failures: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Credit `amount` to the free balance of `principal`.
    pub fn fund(&self, principal: &PrincipalId, amount: u128) {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.entry(principal.clone()).or_default();
        account.free = account.free.saturating_add(amount);
    }

    /// Make the next call to `op` fail with `error`.
    pub fn fail_next(&self, op: LedgerOp, error: LedgerError) {
        self.failures.lock().unwrap().push_back((op, error));
    }

    pub fn free_balance(&self, principal: &PrincipalId) -> u128 {
        self.account(principal).free
    }

    pub fn reserved(&self, principal: &PrincipalId) -> u128 {
        self.account(principal).reserved
    }

    /// Total rewards ever credited to `principal`.
    pub fn rewarded(&self, principal: &PrincipalId) -> u128 {
        self.account(principal).rewarded
    }

    /// Successful and failed calls, in order.
    pub fn calls(&self) -> Vec<(LedgerOp, PrincipalId, u128)> {
        self.calls.lock().unwrap().clone()
    }

    fn account(&self, principal: &PrincipalId) -> Account {
        self.accounts
            .lock()
            .unwrap()
            .get(principal)
            .copied()
            .unwrap_or_default()
    }

    fn take_failure(&self, op: LedgerOp) -> Option<LedgerError> {
        let mut failures = self.failures.lock().unwrap();
        let index = failures.iter().position(|(o, _)| *o == op)?;
        failures.remove(index).map(|(_, e)| e)
    }

    fn apply(&self, op: LedgerOp, principal: &PrincipalId, amount: u128) -> Result<(), LedgerError> {
        self.calls
            .lock()
            .unwrap()
            .push((op, principal.clone(), amount));
        if let Some(error) = self.take_failure(op) {
            return Err(error);
        }

        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.entry(principal.clone()).or_default();
        match op {
            LedgerOp::Reserve => {
                if account.free < amount {
                    return Err(LedgerError::InsufficientBalance {
                        principal: principal.clone(),
                        needed: amount,
                        available: account.free,
                    });
                }
                account.free -= amount;
                account.reserved += amount;
            }
            LedgerOp::Release => {
                if account.reserved < amount {
                    return Err(LedgerError::InsufficientReserved {
                        principal: principal.clone(),
                        needed: amount,
                        reserved: account.reserved,
                    });
                }
                account.reserved -= amount;
                account.free += amount;
            }
            LedgerOp::Reward => {
                account.free = account.free.saturating_add(amount);
                account.rewarded = account.rewarded.saturating_add(amount);
            }
        }
        Ok(())
    }
}

impl Default for NullStakeLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl StakeLedger for NullStakeLedger {
    async fn reserve(&self, principal: &PrincipalId, amount: u128) -> Result<(), LedgerError> {
        self.apply(LedgerOp::Reserve, principal, amount)
    }

    async fn release(&self, principal: &PrincipalId, amount: u128) -> Result<(), LedgerError> {
        self.apply(LedgerOp::Release, principal, amount)
    }

    async fn reward(&self, principal: &PrincipalId, amount: u128) -> Result<(), LedgerError> {
        self.apply(LedgerOp::Reward, principal, amount)
    }
}
