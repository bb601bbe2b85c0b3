//! Engine parameters: every product constant of the consensus and settlement rules.
//!
//! Quorum, voting window, minimum stake and reward ratios live here and nowhere
//! else, so every call site agrees on them.

use crate::amount::TOKEN_UNIT;
use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// All tunable parameters of the trust engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    // ── Consensus ────────────────────────────────────────────────────────
    /// Minimum number of distinct voters before a tally is decisive.
    pub minimum_quorum: u32,

    /// Length of the voting window, measured from report creation.
    /// Default: 7 days.
    pub vote_window_secs: u64,

    // ── Stakes and rewards ───────────────────────────────────────────────
    /// Minimum stake (raw) to open a report. Default: 5 FUM.
    /// Kept as `u64` so the parameter set stays representable in TOML.
    pub min_report_stake: u64,

    /// Reporter reward on an Unsafe verdict, in basis points of the report stake.
    pub reporter_reward_bps: u32,

    /// Reward for a correct voter on an Unsafe verdict, in basis points of the vote weight.
    pub voter_reward_bps: u32,

    // ── AI classifier ────────────────────────────────────────────────────
    /// Upper bound on a single classifier call before it counts as unavailable.
    pub classifier_timeout_ms: u64,

    // ── Report payload ───────────────────────────────────────────────────
    pub min_description_len: usize,
    pub max_description_len: usize,
    pub max_evidence_refs: usize,
}

impl EngineParams {
    pub fn vote_window(&self) -> Duration {
        Duration::from_secs(self.vote_window_secs)
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_millis(self.classifier_timeout_ms)
    }

    /// Reject parameter sets that would make the rules meaningless.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.minimum_quorum == 0 {
            return Err(TypesError::InvalidParams(
                "minimum_quorum must be at least 1".into(),
            ));
        }
        if self.vote_window_secs == 0 {
            return Err(TypesError::InvalidParams(
                "vote_window_secs must be positive".into(),
            ));
        }
        if self.min_report_stake == 0 {
            return Err(TypesError::InvalidParams(
                "min_report_stake must be positive".into(),
            ));
        }
        if self.reporter_reward_bps > 10_000 || self.voter_reward_bps > 10_000 {
            return Err(TypesError::InvalidParams(
                "reward ratios are capped at 10000 bps".into(),
            ));
        }
        if self.classifier_timeout_ms == 0 {
            return Err(TypesError::InvalidParams(
                "classifier_timeout_ms must be positive".into(),
            ));
        }
        if self.min_description_len > self.max_description_len {
            return Err(TypesError::InvalidParams(format!(
                "min_description_len {} exceeds max_description_len {}",
                self.min_description_len, self.max_description_len
            )));
        }
        Ok(())
    }

    /// Fast, permissive parameters for local simulation and tests.
    pub fn dev_defaults() -> Self {
        Self {
            vote_window_secs: 60,
            min_report_stake: 1,
            classifier_timeout_ms: 250,
            min_description_len: 0,
            ..Self::default()
        }
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            minimum_quorum: 1,
            vote_window_secs: 7 * 24 * 60 * 60,
            min_report_stake: (5 * TOKEN_UNIT) as u64,
            reporter_reward_bps: 2_500,
            voter_reward_bps: 1_000,
            classifier_timeout_ms: 10_000,
            min_description_len: 50,
            max_description_len: 500,
            max_evidence_refs: 10,
        }
    }
}
