//! Collaborator contracts for the Fradium trust engine.
//!
//! Every backend (canister storage, a database, in-memory for testing)
//! implements these traits. The engine depends only on the traits and never
//! on a concrete backend.

pub mod error;
pub mod history;
pub mod report;
pub mod stake;

pub use error::{LedgerError, StoreError};
pub use history::{AnalysisHistoryStore, AnalysisRecord, AnalysisSource};
pub use report::ReportStore;
pub use stake::StakeLedger;
