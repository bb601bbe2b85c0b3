//! Pre-built [`tracing::Span`] constructors for the engine operations.
//!
//! Every public engine operation runs inside one of these, so a trace of a
//! request always carries the report id or address it concerned.

use fradium_types::{ChainAddress, PrincipalId, ReportId};
use tracing::{info_span, Span};

/// Span covering report validation, stake reservation and persistence.
pub fn create_report_span(reporter: &PrincipalId, address: &ChainAddress) -> Span {
    info_span!("create_report", reporter = %reporter, address = %address)
}

/// Span covering a single vote, from checks to the stored append.
pub fn cast_vote_span(report: ReportId, voter: &PrincipalId) -> Span {
    info_span!("cast_vote", report = %report, voter = %voter)
}

/// Span covering one participant's settlement, ledger calls included.
pub fn settle_span(report: ReportId, principal: &PrincipalId) -> Span {
    info_span!("settle", report = %report, principal = %principal)
}

/// Span covering a trust evaluation of one address.
pub fn evaluate_span(address: &ChainAddress) -> Span {
    info_span!("evaluate", address = %address)
}
