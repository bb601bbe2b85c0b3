//! Fundamental types for the Fradium trust engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! principals, chain addresses, report identifiers, timestamps, token amounts,
//! engine parameters, and the community report data model.

pub mod address;
pub mod amount;
pub mod error;
pub mod params;
pub mod principal;
pub mod report;
pub mod time;

pub use address::{Chain, ChainAddress};
pub use amount::{bps_of, TOKEN_UNIT};
pub use error::TypesError;
pub use params::EngineParams;
pub use principal::PrincipalId;
pub use report::{Report, ReportId, ReportPayload, Settlement, Vote, VoteChoice};
pub use time::{Clock, SystemClock, Timestamp};
