//! Per-principal history of address analyses.

use crate::StoreError;
use fradium_types::{Chain, ChainAddress, PrincipalId, Timestamp};
use serde::{Deserialize, Serialize};

/// Which subsystem produced an analysis result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisSource {
    AiAnalysis,
    CommunityVote,
}

/// One analysis a principal ran against an address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub principal: PrincipalId,
    pub address: ChainAddress,
    pub chain: Chain,
    pub is_safe: bool,
    pub source: AnalysisSource,
    /// Free-form JSON describing the verdict.
    pub metadata: String,
    pub created_at: Timestamp,
}

pub trait AnalysisHistoryStore: Send + Sync {
    fn append(&self, record: &AnalysisRecord) -> Result<(), StoreError>;

    /// Records for `principal`, newest first, skipping `offset` and returning at most `limit`.
    fn page(
        &self,
        principal: &PrincipalId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<AnalysisRecord>, StoreError>;

    fn count(&self, principal: &PrincipalId) -> Result<u64, StoreError>;
}
