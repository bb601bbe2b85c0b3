//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! Every collaborator of the engine (clock, report store, stake ledger,
//! classifier) is abstracted behind a trait. This crate provides
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (including injected failures)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and simulations.

pub mod classifier;
pub mod clock;
pub mod ledger;
pub mod store;

pub use classifier::NullClassifier;
pub use clock::NullClock;
pub use ledger::{LedgerOp, NullStakeLedger};
pub use store::{NullHistoryStore, NullReportStore};
