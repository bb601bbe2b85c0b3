//! Fradium trust engine: the one entry point for reports, votes, verdicts
//! and settlements.
//!
//! The engine coordinates:
//! - Report creation with stake reservation
//! - Stake-weighted community voting
//! - Quorum/majority resolution once the voting window closes
//! - Reconciliation of the community verdict with the AI classifier
//! - Settlement of stakes and rewards against the stake ledger
//!
//! Storage, the stake ledger, the classifier and the clock are collaborators
//! supplied by the caller.

pub mod config;
pub mod engine;
pub mod error;
pub mod locks;
pub mod logging;
pub mod metrics;
pub mod spans;
pub mod views;

pub use config::EngineConfig;
pub use engine::{Collaborators, TrustEngine};
pub use error::{EngineError, ErrorKind};
pub use locks::KeyedLocks;
pub use logging::{init_logging, LogFormat};
pub use metrics::EngineMetrics;
pub use views::{MyReport, MyVote, ReportView};
