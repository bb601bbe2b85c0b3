//! Community report consensus.
//!
//! A report against an address collects stake-weighted votes until its
//! deadline. After the deadline the verdict is recomputed on every read:
//! 1. **Quorum**: fewer than `minimum_quorum` voters leaves the report *Unresolved*.
//! 2. **Majority**: otherwise the address is *Unsafe* iff the Unsafe weight strictly
//!    exceeds the Safe weight; a tie favours the address.
//!
//! Settlement then returns every participant's stake, with rewards for the
//! reporter and the correct voters when the verdict is Unsafe.

pub mod error;
pub mod lifecycle;
pub mod resolver;
pub mod settlement;
pub mod tally;

pub use error::CommunityError;
pub use lifecycle::{ReportLifecycle, ReportStatus};
pub use resolver::{ConsensusResolver, Resolution, Verdict};
pub use settlement::{compute_payout, record_settlement, ParticipantRole, Payout, RewardSchedule};
pub use tally::{add_vote, check_vote, VoteTally};
