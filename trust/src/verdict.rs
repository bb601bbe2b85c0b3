//! The reconciled trust verdict and its provenance.

use crate::classifier::Classification;
use fradium_community::Verdict;
use fradium_types::ReportId;
use serde::{Deserialize, Serialize};

/// Which signal produced a trust verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// The community verdict alone: either a final Unsafe, or a non-Unsafe
    /// verdict while the classifier was unavailable.
    CommunityOnly,
    /// No report exists; the classifier decided.
    AiOnly,
    /// A non-Unsafe community verdict that the classifier agreed with.
    CommunityConfirmedByAi,
    /// A non-Unsafe community verdict that the classifier flagged as ransomware.
    AiOverride,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::CommunityOnly => "community_only",
            Provenance::AiOnly => "ai_only",
            Provenance::CommunityConfirmedByAi => "community_confirmed_by_ai",
            Provenance::AiOverride => "ai_override",
        }
    }
}

/// What happened when the classifier was (or was not) asked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AiOutcome {
    /// Skipped because the community verdict was already Unsafe.
    NotConsulted,
    Classified(Classification),
    /// Error or timeout, with the reason.
    Unavailable(String),
}

impl AiOutcome {
    pub fn classification(&self) -> Option<&Classification> {
        match self {
            AiOutcome::Classified(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, AiOutcome::Unavailable(_))
    }
}

/// One answer to "is this address safe to send funds to?".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrustVerdict {
    pub is_safe: bool,
    pub provenance: Provenance,
    /// The report whose community verdict contributed, if any.
    pub source_report_id: Option<ReportId>,
    pub community_verdict: Option<Verdict>,
    pub ai: AiOutcome,
}
